//! Interview Chain: job description → resume → five-turn interview.
//! Each step's output is interpolated into the next step's prompt.
//! All generation goes through `llm_client::TextGenerator`.

pub mod chain;
pub mod handlers;
pub mod jd_parser;
pub mod prompts;
pub mod scrubber;
pub mod session;
pub mod store;

#[cfg(test)]
pub mod testing;
