//! Field types

pub mod choice;
pub mod date;
pub mod email;
pub mod file;
pub mod number;
pub mod pattern;
pub mod text;

pub use choice::{Checkboxes, Choice, Choices, Radios, Select};
pub use date::{DateConstraint, DateInput};
pub use email::EmailInput;
pub use file::FileUpload;
pub use number::{DecimalInput, NumberInput};
pub use pattern::RegexInput;
pub use text::TextInput;
