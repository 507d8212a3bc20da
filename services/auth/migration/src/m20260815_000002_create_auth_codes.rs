use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthCodes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuthCodes::StudentId).uuid().not_null())
                    .col(ColumnDef::new(AuthCodes::Code).string().not_null())
                    .col(
                        ColumnDef::new(AuthCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuthCodes::Used)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AuthCodes::Table, AuthCodes::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Serves both verification lookup (latest unused per student) and
        // rate-limit counting over the trailing window.
        manager
            .create_index(
                Index::create()
                    .table(AuthCodes::Table)
                    .col(AuthCodes::StudentId)
                    .col(AuthCodes::CreatedAt)
                    .name("idx_auth_codes_student_id_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AuthCodes {
    Table,
    Id,
    StudentId,
    Code,
    CreatedAt,
    Used,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
}
