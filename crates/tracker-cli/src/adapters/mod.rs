//! Local implementations of the tracker's collaborators

mod checkout;
mod images;
mod ledger;
mod logo;

pub use checkout::LocalCheckout;
pub use images::FsImageStore;
pub use ledger::LedgerCatalog;
pub use logo::HttpLogoFetcher;
