pub mod cache_bust;
pub mod config;
pub mod error;
pub mod format;
pub mod http_client;
pub mod model;
pub mod presenter;
pub mod time;
pub mod transport;
pub mod ui;
pub mod view;

pub use model::{FailureReason, PriceRecord, Snapshot, ViewState};
pub use presenter::DataSyncPresenter;
pub use transport::{HttpTransport, SnapshotTransport};
pub use view::{PriceTableView, TableModel};
