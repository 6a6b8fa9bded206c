//! Field pipeline driver and violation type.

use serde::Serialize;

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            rule,
            message: message.into(),
        }
    }
}

/// One step of a field pipeline.
#[derive(Clone, Copy)]
pub enum Step {
    /// Rewrite the value.
    Canonicalize(fn(&str) -> String),
    /// Reject the value unless `test` holds. `message` is prefixed with the field name.
    Check {
        rule: &'static str,
        message: &'static str,
        test: fn(&str) -> bool,
    },
}

/// An ordered list of canonicalizers and checks for one field.
///
/// Steps run in order; the first failing check stops the pipeline and is
/// reported. The output of the last canonicalizer is the accepted value.
pub struct FieldPipeline {
    pub field: &'static str,
    pub steps: &'static [Step],
}

impl FieldPipeline {
    pub fn run(&self, raw: &str) -> Result<String, FieldViolation> {
        let mut value = raw.to_string();
        for step in self.steps {
            match *step {
                Step::Canonicalize(f) => value = f(&value),
                Step::Check {
                    rule,
                    message,
                    test,
                } => {
                    if !test(&value) {
                        return Err(FieldViolation::new(
                            self.field,
                            rule,
                            format!("{} {message}", self.field),
                        ));
                    }
                }
            }
        }
        Ok(value)
    }

    /// Run a field that must be present.
    pub fn run_required(&self, raw: Option<&str>) -> Result<String, FieldViolation> {
        match raw {
            Some(v) => self.run(v),
            None => Err(FieldViolation::new(
                self.field,
                "required",
                format!("{} should not be empty", self.field),
            )),
        }
    }
}

/// Accumulates violations across fields.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    /// Record the outcome of one field, keeping the value on success.
    pub fn collect<T>(&mut self, outcome: Result<T, FieldViolation>) -> Option<T> {
        match outcome {
            Ok(v) => Some(v),
            Err(violation) => {
                self.0.push(violation);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<FieldViolation> {
        self.0
    }
}
