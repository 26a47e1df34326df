use std::fmt::Display;

/// Why a lookup produced no value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissReason {
	/// Nothing is stored under the key.
	Absent,
	/// An entry existed but its TTL had run out; it has been removed.
	Expired,
	/// The stored payload could not be decoded; it has been removed.
	Malformed,
	/// The store could not be read.
	StoreFailure,
}

impl Display for MissReason {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			MissReason::Absent => "absent",
			MissReason::Expired => "expired",
			MissReason::Malformed => "malformed",
			MissReason::StoreFailure => "store failure",
		})
	}
}

/// Outcome of a cache read.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup<T> {
	Hit(T),
	Miss(MissReason),
}

impl<T> Lookup<T> {
	pub fn is_hit(&self) -> bool {
		matches!(self, Lookup::Hit(_))
	}

	pub fn miss_reason(&self) -> Option<MissReason> {
		match self {
			Lookup::Hit(_) => None,
			Lookup::Miss(reason) => Some(*reason),
		}
	}
}
