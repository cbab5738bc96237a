//! Schema validation for implementation-specific TOML configuration.
//!
//! Targets and event sources receive an untyped `toml::Value`. Each
//! implementation describes what it accepts with a [`Schema`] and exposes it
//! through [`ConfigSchema`], so a bad entry is rejected with a precise field
//! path before any constructor runs.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
	#[error("Missing required field: {0}")]
	MissingField(String),
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
}

impl ValidationError {
	/// Prefixes the offending field path with `parent`.
	fn nested(self, parent: &str) -> Self {
		let join = |field: String| format!("{}.{}", parent, field);
		match self {
			Self::MissingField(field) => Self::MissingField(join(field)),
			Self::InvalidValue { field, message } => Self::InvalidValue {
				field: join(field),
				message,
			},
			Self::TypeMismatch {
				field,
				expected,
				actual,
			} => Self::TypeMismatch {
				field: join(field),
				expected,
				actual,
			},
		}
	}

	fn mismatch(field: &str, expected: &str, value: &toml::Value) -> Self {
		Self::TypeMismatch {
			field: field.to_string(),
			expected: expected.to_string(),
			actual: value.type_str().to_string(),
		}
	}
}

#[derive(Debug)]
pub enum FieldType {
	String,
	Integer { min: Option<i64>, max: Option<i64> },
	Boolean,
	Array(Box<FieldType>),
	Table(Schema),
}

pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Attaches a check that runs after the type check passes.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		check_type(&self.name, value, &self.field_type)?;
		if let Some(validator) = &self.validator {
			validator(value).map_err(|message| ValidationError::InvalidValue {
				field: self.name.clone(),
				message,
			})?;
		}
		Ok(())
	}
}

#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates `config`, which must be a table. Unknown keys are ignored.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::mismatch("root", "table", config))?;

		for field in &self.required {
			match table.get(&field.name) {
				Some(value) => field.check(value)?,
				None => return Err(ValidationError::MissingField(field.name.clone())),
			}
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.check(value)?;
			}
		}

		Ok(())
	}
}

fn check_type(name: &str, value: &toml::Value, expected: &FieldType) -> Result<(), ValidationError> {
	match expected {
		FieldType::String if value.is_str() => Ok(()),
		FieldType::String => Err(ValidationError::mismatch(name, "string", value)),
		FieldType::Boolean if value.is_bool() => Ok(()),
		FieldType::Boolean => Err(ValidationError::mismatch(name, "boolean", value)),
		FieldType::Integer { min, max } => {
			let int = value
				.as_integer()
				.ok_or_else(|| ValidationError::mismatch(name, "integer", value))?;
			let message = match (*min, *max) {
				(Some(min), _) if int < min => {
					format!("Value {} is less than minimum {}", int, min)
				}
				(_, Some(max)) if int > max => {
					format!("Value {} is greater than maximum {}", int, max)
				}
				_ => return Ok(()),
			};
			Err(ValidationError::InvalidValue {
				field: name.to_string(),
				message,
			})
		}
		FieldType::Array(inner) => {
			let items = value
				.as_array()
				.ok_or_else(|| ValidationError::mismatch(name, "array", value))?;
			items
				.iter()
				.enumerate()
				.try_for_each(|(i, item)| check_type(&format!("{}[{}]", name, i), item, inner))
		}
		FieldType::Table(schema) => schema.validate(value).map_err(|e| e.nested(name)),
	}
}

/// Implemented by every configurable target and event source.
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

/// Validator for fields that must be an `http://` or `https://` URL.
pub fn http_url(value: &toml::Value) -> Result<(), String> {
	match value.as_str() {
		Some(url) if url.starts_with("http://") || url.starts_with("https://") => Ok(()),
		_ => Err("URL must start with http:// or https://".to_string()),
	}
}
