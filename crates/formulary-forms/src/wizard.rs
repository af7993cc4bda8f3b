//! Multi-step forms with conditional questions
//!
//! A [`Wizard`] is an ordered list of [`Question`]s. Each valid POST merges
//! the step's answers into an accumulator kept in the session, then moves to
//! the next question whose predicate holds. When no question is left the
//! wizard runs its backends over the answers of the questions actually asked.

use crate::backend::{Backend, FormRequest, SessionBackend};
use crate::data::{CleanedData, FormData, RawValue};
use crate::field::FormField;
use crate::fieldset::{Fieldset, Items};
use crate::form::{FormError, SuccessTarget, run_backends};
use crate::response::Redirect;
use crate::view::Page;
use formulary_sessions::Session;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
	#[error("Wizard '{wizard}' has no step {step}")]
	NotFound { wizard: String, step: usize },

	#[error(transparent)]
	Form(#[from] FormError),

	#[error("Session error: {0}")]
	Session(String),
}

pub type WizardResult<T> = Result<T, WizardError>;

/// Answers collected so far in one wizard run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accumulator {
	/// Raw values, used for prefilling and for predicates
	pub values: IndexMap<String, RawValue>,
	/// Clean values, handed to the backends at the end
	pub data: CleanedData,
}

/// One step of a wizard
///
/// # Examples
///
/// ```
/// use formulary_forms::{Question, Radios, RawValue};
/// use indexmap::IndexMap;
///
/// let question = Question::new("health")
///     .field(Radios::new("health", ["yes", "no"]))
///     .when("permission", "yes");
///
/// let mut answers = IndexMap::new();
/// assert!(!question.is_available(&answers));
/// answers.insert("permission".to_string(), RawValue::from("yes"));
/// assert!(question.is_available(&answers));
/// ```
#[derive(Debug)]
pub struct Question {
	name: String,
	title: String,
	items: Items,
	predicate: IndexMap<String, RawValue>,
	cta: String,
}

impl Question {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			title: String::new(),
			items: Items::default(),
			predicate: IndexMap::new(),
			cta: "Continue".to_string(),
		}
	}

	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	pub fn field(mut self, field: impl FormField + 'static) -> Self {
		self.items.push_field(Box::new(field));
		self
	}

	pub fn fieldset(mut self, fieldset: Fieldset) -> Self {
		self.items.push_fieldset(fieldset);
		self
	}

	/// Only ask this question when an earlier answer equals `value`.
	///
	/// Several conditions must all hold.
	pub fn when(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
		self.predicate.insert(name.into(), value.into());
		self
	}

	pub fn cta(mut self, cta: impl Into<String>) -> Self {
		self.cta = cta.into();
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn items(&self) -> &Items {
		&self.items
	}

	/// Whether every condition matches the raw answers; an unanswered name never matches
	pub fn is_available(&self, values: &IndexMap<String, RawValue>) -> bool {
		self.predicate
			.iter()
			.all(|(name, expected)| values.get(name) == Some(expected))
	}
}

/// What a POST to a wizard step led to
#[derive(Debug)]
pub enum StepOutcome {
	/// The answers did not validate; render the page again
	Invalid(Page),
	/// Go to the next question
	Next(Redirect),
	/// Every backend ran; go to the success page
	Finished(Redirect),
}

/// A multi-step form.
///
/// Like [`Form`](crate::Form), a wizard is rebuilt for every request; the
/// only state carried between steps is the [`Accumulator`] in the session.
#[derive(Debug)]
pub struct Wizard {
	name: String,
	title: String,
	base_url: String,
	questions: Vec<Question>,
	backends: Vec<Arc<dyn Backend>>,
	success: SuccessTarget,
}

impl Wizard {
	pub fn builder(name: impl Into<String>) -> WizardBuilder {
		WizardBuilder::new(name)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn len(&self) -> usize {
		self.questions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.questions.is_empty()
	}

	pub fn question(&self, step: usize) -> Option<&Question> {
		self.questions.get(step)
	}

	/// URL of a step
	pub fn step_url(&self, step: usize) -> String {
		format!("{}/{}", self.base_url.trim_end_matches('/'), step)
	}

	/// Session key holding this wizard's accumulator
	pub fn session_key(&self) -> String {
		format!("wizard:{}", self.name)
	}

	pub fn accumulator(&self, session: &Session) -> WizardResult<Accumulator> {
		session
			.get_as::<Accumulator>(&self.session_key())
			.map(Option::unwrap_or_default)
			.map_err(|e| WizardError::Session(e.to_string()))
	}

	fn save_accumulator(&self, session: &mut Session, accumulator: &Accumulator) -> WizardResult<()> {
		session
			.set_as(self.session_key(), accumulator)
			.map_err(|e| WizardError::Session(e.to_string()))
	}

	fn not_found(&self, step: usize) -> WizardError {
		WizardError::NotFound {
			wizard: self.name.clone(),
			step,
		}
	}

	fn page(&self, step: usize) -> WizardResult<Page> {
		let question = self.questions.get(step).ok_or_else(|| self.not_found(step))?;
		let title = if question.title.is_empty() {
			self.title.clone()
		} else {
			question.title.clone()
		};
		Ok(Page {
			title,
			form_name: self.name.clone(),
			method: "post".to_string(),
			action: self.step_url(step),
			cta: question.cta.clone(),
			error_summary: question.items.error_summary(),
			errors: question.items.errors(),
			items: question.items.view(),
		})
	}

	/// Render a step, prefilled with any answers already given
	pub fn get(&mut self, step: usize, session: &Session) -> WizardResult<Page> {
		let accumulator = self.accumulator(session)?;
		let question = self
			.questions
			.get_mut(step)
			.ok_or_else(|| WizardError::NotFound {
				wizard: self.name.clone(),
				step,
			})?;
		question.items.prefill(&accumulator.values);
		self.page(step)
	}

	/// Handle the answers to one step.
	///
	/// A step is only accepted once every earlier question on the current path
	/// has been answered; otherwise the browser is sent back to the first
	/// unanswered one and nothing is bound.
	pub async fn post(&mut self, step: usize, request: &mut FormRequest) -> WizardResult<StepOutcome> {
		if step >= self.questions.len() {
			return Err(self.not_found(step));
		}

		let mut accumulator = self.accumulator(&request.session)?;
		if let Some(resume) = self.resume_before(step, &accumulator.values) {
			tracing::debug!(wizard = %self.name, step, resume, "step posted out of order");
			return Ok(StepOutcome::Next(Redirect::see_other(self.step_url(resume))));
		}

		let question = &mut self.questions[step];
		question.items.bind(&request.data);
		if !question.items.valid() {
			return Ok(StepOutcome::Invalid(self.page(step)?));
		}

		let question = &self.questions[step];
		let cleaned = question.items.clean().await.map_err(FormError::from)?;
		accumulator.values.extend(answered_values(&question.items, &cleaned));
		accumulator.data.extend(cleaned);
		self.save_accumulator(&mut request.session, &accumulator)?;

		if let Some(next) = self.next_step(step, &accumulator.values) {
			tracing::debug!(wizard = %self.name, from = step, to = next, "wizard step completed");
			return Ok(StepOutcome::Next(Redirect::see_other(self.step_url(next))));
		}
		if let Some(missing) = self.first_unanswered(&accumulator.values) {
			tracing::debug!(wizard = %self.name, step = missing, "wizard has unanswered questions");
			return Ok(StepOutcome::Next(Redirect::see_other(self.step_url(missing))));
		}

		let data = self.collected_data(&accumulator);
		run_backends(&self.backends, request, &self.name, &data)
			.await
			.map_err(FormError::from)?;
		request.session.remove(&self.session_key());
		tracing::debug!(wizard = %self.name, step, "wizard finished");

		let answers = self.collected_values(&accumulator);
		Ok(StepOutcome::Finished(Redirect::see_other(
			self.success.resolve(&answers),
		)))
	}

	/// Whether every field of a question has a stored answer
	fn is_answered(&self, step: usize, values: &IndexMap<String, RawValue>) -> bool {
		self.questions[step]
			.items
			.fields()
			.all(|field| values.contains_key(field.name()))
	}

	/// The first question on the path that has no stored answer yet
	pub fn first_unanswered(&self, values: &IndexMap<String, RawValue>) -> Option<usize> {
		self.path(values)
			.into_iter()
			.find(|&step| !self.is_answered(step, values))
	}

	/// Where to send a POST for `step` that cannot be accepted yet, or `None`
	/// when the step is on the path and everything before it is answered
	fn resume_before(&self, step: usize, values: &IndexMap<String, RawValue>) -> Option<usize> {
		let path = self.path(values);
		let earlier_answered = path
			.iter()
			.take_while(|&&taken| taken != step)
			.all(|&taken| self.is_answered(taken, values));
		if path.contains(&step) && earlier_answered {
			return None;
		}
		self.first_unanswered(values).or(path.last().copied())
	}

	/// The first question after `step` whose predicate holds, or `None` when
	/// the wizard is done
	pub fn next_step(&self, step: usize, values: &IndexMap<String, RawValue>) -> Option<usize> {
		let mut next = step + 1;
		while let Some(question) = self.questions.get(next) {
			if question.is_available(values) {
				return Some(next);
			}
			tracing::debug!(wizard = %self.name, step = next, question = %question.name, "question skipped");
			next += 1;
		}
		None
	}

	/// Steps taken from the first question given these answers
	pub fn path(&self, values: &IndexMap<String, RawValue>) -> Vec<usize> {
		if self.questions.is_empty() {
			return Vec::new();
		}
		let mut path = vec![0];
		let mut step = 0;
		while let Some(next) = self.next_step(step, values) {
			path.push(next);
			step = next;
		}
		path
	}

	/// Clean values of the questions on the path taken, in question order
	pub fn collected_data(&self, accumulator: &Accumulator) -> CleanedData {
		let mut data = CleanedData::new();
		for step in self.path(&accumulator.values) {
			for field in self.questions[step].items.fields() {
				if let Some(value) = accumulator.data.get(field.name()) {
					data.insert(field.name().to_string(), value.clone());
				}
			}
		}
		data
	}
	/// Raw answers of the questions on the path taken, as form data
	pub fn collected_values(&self, accumulator: &Accumulator) -> FormData {
		self.path(&accumulator.values)
			.into_iter()
			.flat_map(|step| self.questions[step].items.fields())
			.filter_map(|field| {
				accumulator
					.values
					.get(field.name())
					.map(|raw| (field.name().to_string(), raw.clone()))
			})
			.collect()
	}
}

/// Raw values to keep between steps. Uploads are replaced by the stored name
/// so file content never lands in the session.
fn answered_values(items: &Items, cleaned: &CleanedData) -> IndexMap<String, RawValue> {
	items
		.values()
		.into_iter()
		.map(|(name, raw)| {
			let raw = match raw {
				RawValue::File(_) => match cleaned.get(&name) {
					Some(serde_json::Value::String(stored)) => RawValue::Text(stored.clone()),
					_ => RawValue::Empty,
				},
				other => other,
			};
			(name, raw)
		})
		.collect()
}

/// Builder for [`Wizard`]
pub struct WizardBuilder {
	name: String,
	title: String,
	base_url: String,
	questions: Vec<Question>,
	backends: Vec<Arc<dyn Backend>>,
	success: SuccessTarget,
}

impl WizardBuilder {
	fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			base_url: format!("/wizards/{}", name),
			name,
			title: String::new(),
			questions: Vec::new(),
			backends: Vec::new(),
			success: SuccessTarget::default(),
		}
	}

	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = title.into();
		self
	}

	pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	pub fn question(mut self, question: Question) -> Self {
		self.questions.push(question);
		self
	}

	pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
		self.backends.push(backend);
		self
	}

	pub fn success_url(mut self, url: impl Into<String>) -> Self {
		self.success = SuccessTarget::Url(url.into());
		self
	}

	/// Compute the success URL from the answers.
	///
	/// The closure sees the raw answers of every question on the path taken,
	/// not just the last POST body. Uploads appear as their stored name.
	pub fn success_with<F>(mut self, f: F) -> Self
	where
		F: Fn(&FormData) -> String + Send + Sync + 'static,
	{
		self.success = SuccessTarget::Dynamic(Arc::new(f));
		self
	}

	pub fn build(self) -> Result<Wizard, FormError> {
		if self.questions.is_empty() {
			return Err(FormError::Configuration(format!(
				"wizard '{}' has no questions",
				self.name
			)));
		}
		if let Some(question) = self.questions.iter().find(|q| q.items.is_empty()) {
			return Err(FormError::Configuration(format!(
				"question '{}' of wizard '{}' has no fields",
				question.name, self.name
			)));
		}

		let backends = if self.backends.is_empty() {
			vec![Arc::new(SessionBackend) as Arc<dyn Backend>]
		} else {
			self.backends
		};

		Ok(Wizard {
			name: self.name,
			title: self.title,
			base_url: self.base_url,
			questions: self.questions,
			backends,
			success: self.success,
		})
	}
}
