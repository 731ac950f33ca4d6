use std::fmt::Display;

use serde::ser::{self, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub(crate) enum FiniteCheckError {
    #[error("Non-finite number: {0}")]
    NonFinite(f64),

    #[error("{0}")]
    Custom(String)
}

impl ser::Error for FiniteCheckError {
    #[inline]
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Serializer which only walks the value and fails
/// on the first NaN or infinite float.
///
/// JSON values can't hold such numbers and would
/// silently turn them into `null`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FiniteCheck;

impl FiniteCheck {
    #[inline]
    pub fn check(value: &impl Serialize) -> Result<(), FiniteCheckError> {
        value.serialize(Self)
    }

    #[inline]
    fn float(value: f64) -> Result<(), FiniteCheckError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(FiniteCheckError::NonFinite(value))
        }
    }
}

impl ser::Serializer for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_i8(self, _: i8) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_i16(self, _: i16) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_i32(self, _: i32) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_i64(self, _: i64) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_i128(self, _: i128) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_u8(self, _: u8) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_u16(self, _: u16) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_u32(self, _: u32) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_u64(self, _: u64) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_u128(self, _: u128) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_char(self, _: char) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_str(self, _: &str) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_bytes(self, _: &[u8]) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_none(self) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_unit(self) -> Result<(), Self::Error> { Ok(()) }
    fn serialize_unit_struct(self, _: &'static str) -> Result<(), Self::Error> { Ok(()) }

    #[inline]
    fn serialize_f32(self, value: f32) -> Result<(), Self::Error> {
        Self::float(value as f64)
    }

    #[inline]
    fn serialize_f64(self, value: f64) -> Result<(), Self::Error> {
        Self::float(value)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<(), Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _: &'static str, value: &T) -> Result<(), Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(self, _: &'static str, _: u32, _: &'static str, value: &T) -> Result<(), Self::Error> {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> { Ok(self) }
    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple, Self::Error> { Ok(self) }
    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self::SerializeTupleStruct, Self::Error> { Ok(self) }
    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap, Self::Error> { Ok(self) }
    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self::SerializeStruct, Self::Error> { Ok(self) }

    fn serialize_tuple_variant(self, _: &'static str, _: u32, _: &'static str, _: usize) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(self)
    }

    fn serialize_struct_variant(self, _: &'static str, _: u32, _: &'static str, _: usize) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Self::Error> { Ok(()) }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Self::Error> { Ok(()) }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Self::Error> { Ok(()) }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Self::Error> { Ok(()) }
}

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Self::Error> {
        key.serialize(*self)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Self::Error> { Ok(()) }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &'static str, value: &T) -> Result<(), Self::Error> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Self::Error> { Ok(()) }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = FiniteCheckError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &'static str, value: &T) -> Result<(), Self::Error> {
        value.serialize(*self)
    }

    fn end(self) -> Result<(), Self::Error> { Ok(()) }
}
