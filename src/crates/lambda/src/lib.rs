pub mod event;
pub mod translate;

pub use event::ApiGatewayProxyResponse;
pub use translate::{event_to_request, response_to_event};
