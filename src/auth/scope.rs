//! Ordered, de-duplicated scope lists.

// std
use std::slice::Iter;
// crates.io
use serde::{Deserializer, Serializer, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// OAuth scopes kept in first-seen order without duplicates.
///
/// Providers receive scopes in the order the client asked for them, so unlike a sorted set the
/// list preserves insertion order. [`insert`](Self::insert) is idempotent: a scope that is
/// already present is ignored and keeps its original position.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeList(Vec<String>);
impl ScopeList {
	/// Builds a list from any iterator, dropping repeated entries.
	pub fn new<I, S>(scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut list = Self::default();

		list.extend(scopes);

		list
	}

	/// Appends `scope` unless it is already present; returns whether it was added.
	pub fn insert(&mut self, scope: impl Into<String>) -> bool {
		let scope = scope.into();

		if self.contains(&scope) {
			return false;
		}

		self.0.push(scope);

		true
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|candidate| candidate == scope)
	}

	/// Iterator over scopes in insertion order.
	pub fn iter(&self) -> Iter<'_, String> {
		self.0.iter()
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}

	/// Joins the scopes with `delimiter`, the encoding most providers expect in `scope`.
	pub fn join(&self, delimiter: &str) -> String {
		self.0.join(delimiter)
	}
}
impl<S> Extend<S> for ScopeList
where
	S: Into<String>,
{
	fn extend<I>(&mut self, iter: I)
	where
		I: IntoIterator<Item = S>,
	{
		for scope in iter {
			self.insert(scope);
		}
	}
}
impl<S> FromIterator<S> for ScopeList
where
	S: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = S>,
	{
		Self::new(iter)
	}
}
impl<'a> IntoIterator for &'a ScopeList {
	type IntoIter = Iter<'a, String>;
	type Item = &'a String;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
impl AsRef<[String]> for ScopeList {
	fn as_ref(&self) -> &[String] {
		&self.0
	}
}
impl Debug for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeList").field(&self.0).finish()
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.join(" "))
	}
}
impl Serialize for ScopeList {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.0.len()))?;

		for scope in self.0.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeList {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let values = <Vec<String>>::deserialize(deserializer)?;

		Ok(ScopeList::new(values))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn duplicates_keep_first_seen_order() {
		let scopes = ScopeList::new(["email", "profile", "email"]);

		assert_eq!(scopes.as_slice(), ["email".to_string(), "profile".to_string()]);
		assert_eq!(scopes.len(), 2);
		assert_eq!(scopes.to_string(), "email profile");
	}

	#[test]
	fn insert_is_idempotent() {
		let mut scopes = ScopeList::default();

		assert!(scopes.insert("openid"));
		assert!(scopes.insert("email"));
		assert!(!scopes.insert("openid"));
		assert_eq!(scopes.iter().map(String::as_str).collect::<Vec<_>>(), ["openid", "email"]);
		assert!(scopes.contains("email"));
		assert!(!scopes.contains("profile"));
	}

	#[test]
	fn deserialization_drops_duplicates() {
		let scopes: ScopeList = serde_json::from_str("[\"a\",\"b\",\"a\",\"c\"]")
			.expect("Scope list should deserialize from a JSON array.");

		assert_eq!(scopes.join(","), "a,b,c");
		assert_eq!(
			serde_json::to_string(&scopes).expect("Scope list should serialize to JSON."),
			"[\"a\",\"b\",\"c\"]"
		);
	}
}
