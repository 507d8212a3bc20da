//! Session-token artifacts shared between the auth service and the portal
//! application layer: the signed bearer-token codec and the cookie builders
//! that transport it.

pub mod cookie;
pub mod token;
