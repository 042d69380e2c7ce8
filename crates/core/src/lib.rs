pub mod clean;
pub mod error;
pub mod extract;
pub mod metadata;
pub mod outcome;
pub mod parse;
pub mod paywall;
pub mod reader;

#[cfg(feature = "fetch")]
pub mod completion;
#[cfg(feature = "fetch")]
pub mod fetch;
#[cfg(feature = "fetch")]
pub mod image;
#[cfg(feature = "fetch")]
pub mod tasks;

pub use clean::{EXCLUDED_SELECTORS, ExclusionSet, strip_excluded};
pub use error::{ReferentError, Result};
#[doc(hidden)]
pub use extract::{CASCADE, CONTENT_MARKER_DIVS, CONTENT_SELECTORS, Candidate};
pub use extract::{ExtractConfig, ExtractionResult, Strategy, extract_content};
pub use metadata::Metadata;
pub use outcome::{ExtractionOutcome, FailureReason, classify};
pub use parse::{Document, Element};
pub use paywall::{PAYWALL_INDICATORS, is_paywalled};
pub use reader::{Extraction, Reader, ReaderConfig, ReaderConfigBuilder, extract};

#[cfg(feature = "fetch")]
pub use completion::{CompletionClient, CompletionConfig, CompletionRequest, OpenRouterClient};
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, Fetcher, HttpFetcher, fetch_file, fetch_stdin, fetch_url};
#[cfg(feature = "fetch")]
pub use image::{HuggingFaceClient, Illustration, ImageClient, ImageConfig};
#[cfg(feature = "fetch")]
pub use reader::fetch_and_extract;
#[cfg(feature = "fetch")]
pub use tasks::{Task, illustrate, run_task};
