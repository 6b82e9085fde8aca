//! Permission-scope modeling for the authorization dialog.

// self
use crate::_prelude::*;

/// Errors emitted when validating scope entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain delimiter characters.
	#[error("Scope contains a delimiter character: {scope}.")]
	ContainsDelimiter {
		/// The offending scope string.
		scope: String,
	},
}

/// Ordered, deduplicated permission list rendered into the dialog's `scope` parameter.
///
/// Input may be space- or comma-delimited; the provider's dialog accepts a comma-joined
/// list. Defaults to no permissions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeList(Vec<String>);
impl ScopeList {
	/// Creates a validated scope list from any iterator, deduplicating while preserving
	/// the caller's order.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut list = Vec::new();

		for scope in scopes {
			let scope = scope.into();

			if scope.is_empty() {
				return Err(ScopeError::Empty);
			}
			if scope.chars().any(|c| c.is_whitespace() || c == ',') {
				return Err(ScopeError::ContainsDelimiter { scope });
			}
			if !list.contains(&scope) {
				list.push(scope);
			}
		}

		Ok(Self(list))
	}

	/// Parses a space- or comma-delimited scope string, skipping empty segments.
	pub fn parse(raw: &str) -> Self {
		let mut list = Vec::new();

		for scope in raw.split([',', ' ']).map(str::trim).filter(|s| !s.is_empty()) {
			if !list.iter().any(|have: &String| have == scope) {
				list.push(scope.to_owned());
			}
		}

		Self(list)
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no permissions are requested.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator over the scope entries.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Returns the comma-joined representation placed into the dialog URL.
	pub fn normalized(&self) -> String {
		self.0.join(",")
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.normalized())
	}
}
