// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! MAL types: scalar atoms and columns (BATs) of atoms.

/// Atom types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Void,
    Bit,
    Bte,
    Sht,
    Int,
    Oid,
    Lng,
    /// 128-bit integer.
    Hge,
    Flt,
    Dbl,
    Str,
}

impl ScalarType {
    /// Atom name as it appears in MAL, e.g. `calc.int(...)`.
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Void => "void",
            ScalarType::Bit => "bit",
            ScalarType::Bte => "bte",
            ScalarType::Sht => "sht",
            ScalarType::Int => "int",
            ScalarType::Oid => "oid",
            ScalarType::Lng => "lng",
            ScalarType::Hge => "hge",
            ScalarType::Flt => "flt",
            ScalarType::Dbl => "dbl",
            ScalarType::Str => "str",
        }
    }

    /// Storage width in bytes. Strings count as a pointer.
    pub fn width(self) -> u32 {
        match self {
            ScalarType::Void => 0,
            ScalarType::Bit | ScalarType::Bte => 1,
            ScalarType::Sht => 2,
            ScalarType::Int | ScalarType::Flt => 4,
            ScalarType::Oid | ScalarType::Lng | ScalarType::Dbl | ScalarType::Str => 8,
            ScalarType::Hge => 16,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ScalarType::Bte | ScalarType::Sht | ScalarType::Int | ScalarType::Lng | ScalarType::Hge
        )
    }

    /// True when both are integer atoms and `self` is stored in fewer bytes.
    /// Non-integer atoms are never narrower than anything.
    pub fn is_narrower_than(self, other: ScalarType) -> bool {
        self.is_integer() && other.is_integer() && self.width() < other.width()
    }
}

/// Static type of a MAL variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MalType {
    Scalar(ScalarType),
    /// A column of atoms, written `bat[:int]`.
    Bat(ScalarType),
}

impl MalType {
    /// Element type for columns, the type itself for scalars.
    pub fn column_type(self) -> ScalarType {
        match self {
            MalType::Scalar(t) | MalType::Bat(t) => t,
        }
    }

    /// Name a conversion to this type carries as its function name.
    pub fn atom_name(self) -> &'static str {
        match self {
            MalType::Scalar(t) => t.name(),
            MalType::Bat(_) => "bat",
        }
    }
}

impl From<ScalarType> for MalType {
    fn from(t: ScalarType) -> Self {
        MalType::Scalar(t)
    }
}
