pub mod docs_scraper;

pub use docs_scraper::{DocsScraper, PageExtract};
