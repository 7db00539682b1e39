//! Step definitions: glue between Gherkin steps and the page objects / API
//! client on the scenario state. Failures propagate to the runner untouched.

pub mod open_library;
pub mod stamp_duty;
