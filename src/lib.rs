pub mod app;
pub mod clock;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod verse;

pub use app::router;
pub use clock::{Clock, FixedClock, SystemClock};
pub use state::AppState;
pub use storage::{resolve_data_path, JsonFileStorage, LogStorage, MemoryStorage};
pub use store::ActivityStore;
