pub mod catalog;
pub mod clock;
pub mod decoder;
pub mod listener;

pub use catalog::{MemoryCatalog, ThemeCatalog};
pub use clock::{Clock, MockClock, SystemClock};
pub use decoder::AssetDecoder;
pub use listener::PresentationListener;
