mod pos_session;
mod tracing;

pub use self::pos_session::PosSession;
pub use self::tracing::setup_tracing;
