//! Site generation
//!
//! The default policy for producing input sites. The diagram itself accepts
//! any caller-supplied site list.

mod sites;

pub use sites::SiteGenerator;
