pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod models;
pub mod render;
pub mod session;
pub mod status;
pub mod store;
pub mod tracing_setup;
pub mod view;
pub mod widget;

pub use api::{HttpApi, MessagingApi};
pub use config::CoreConfig;
pub use error::{ApiError, SessionError, WidgetError};
pub use events::WidgetEvent;
pub use session::{Session, SessionStore, UserType};
pub use widget::MessagingWidget;
