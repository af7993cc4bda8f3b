//! # Formulary Forms
//!
//! Field validation, form binding and multi-step wizards.
//!
//! ## Overview
//!
//! A [`Form`] is an ordered list of fields and [`Fieldset`]s. Binding
//! submitted [`FormData`] assigns each field its raw value and computes its
//! error; a valid form is cleaned into [`CleanedData`] and handed to each
//! [`Backend`] in turn.
//!
//! A [`Wizard`] splits the same machinery over several [`Question`]s, keeping
//! answers in the session between steps and skipping questions whose
//! predicate does not hold.
//!
//! ## Field types
//!
//! - [`TextInput`], [`NumberInput`], [`DecimalInput`], [`EmailInput`], [`RegexInput`]
//! - [`DateInput`] (three-part day/month/year with past/future constraints)
//! - [`Radios`], [`Checkboxes`], [`Select`]
//! - [`FileUpload`] (persists to a [`formulary_storages::StorageBackend`])
//!
//! ## Example
//!
//! ```
//! use formulary_forms::{Form, FormData, FormField, Radios, TextInput};
//!
//! let mut form = Form::builder("feedback")
//!     .field(Radios::new("satisfaction", ["Satisfied", "Dissatisfied"]).with_label("How was it?"))
//!     .field(TextInput::new("comments").with_max_words(100).optional())
//!     .build()
//!     .unwrap();
//!
//! form.bind(FormData::from_urlencoded("satisfaction=satisfied").unwrap());
//! assert!(form.valid());
//! ```

pub mod backend;
pub mod data;
pub mod field;
pub mod fields;
pub mod fieldset;
pub mod form;
pub mod response;
pub mod view;
pub mod wizard;

pub use backend::{
	AddSessionBackend, Backend, BackendError, BackendResult, FormRequest, LogBackend,
	SessionBackend,
};
pub use data::{CleanedData, FormData, RawValue, UploadedFile};
pub use field::{FieldBase, FieldError, FieldResult, FormField};
pub use fields::{
	Checkboxes, Choice, Choices, DateConstraint, DateInput, DecimalInput, EmailInput, FileUpload,
	NumberInput, Radios, RegexInput, Select, TextInput,
};
pub use fieldset::{Fieldset, FormItem, Items};
pub use form::{Form, FormBuilder, FormError, FormResult, SuccessTarget};
pub use response::Redirect;
pub use view::{ErrorLink, ErrorSummary, FieldView, ItemView, Page};
pub use wizard::{Accumulator, Question, StepOutcome, Wizard, WizardBuilder, WizardError, WizardResult};
