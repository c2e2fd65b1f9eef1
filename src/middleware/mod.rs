pub mod auth;
pub mod request_id;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use request_id::{request_id_middleware, RequestContext, REQUEST_ID_HEADER};
pub use response::{ApiResponse, ApiResult};
