mod blocking_transport;
mod mock_transport;

#[allow(unused_imports)]
pub use blocking_transport::BlockingTransport;
#[allow(unused_imports)]
pub use mock_transport::{MockTransport, SentMessage};
