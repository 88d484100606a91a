//! Conversion of any `Serialize` type into a [`Value`].
//!
//! Unlike `serde_json::to_value`, struct and newtype names survive the
//! conversion: structs become [`Value::Record`] and newtypes become
//! [`Value::Named`], so both can be matched by registered formatters.

use serde::ser::{self, Serialize};
use thiserror::Error;

use super::{Record, Value};

/// Error raised by a `Serialize` implementation during conversion.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{0}")]
pub struct ValueError(String);

impl ser::Error for ValueError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        ValueError(msg.to_string())
    }
}

/// Converts a serializable value into a [`Value`].
///
/// # Example
///
/// ```rust
/// use fstr::{to_value, Value};
///
/// assert_eq!(to_value(&42u8).unwrap(), Value::Uint(42));
/// assert_eq!(to_value(&vec!["a"]).unwrap(), Value::seq(["a"]));
/// ```
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, ValueError> {
    value.serialize(ValueSerializer)
}

/// Widens an `f32` through its shortest decimal form, so `0.1f32` stays
/// `0.1` instead of `0.10000000149011612`.
pub(crate) fn widen_f32(n: f32) -> f64 {
    n.to_string().parse().unwrap_or(f64::from(n))
}

/// The serde [`Serializer`](ser::Serializer) producing [`Value`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = ValueError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = SeqBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = RecordBuilder;
    type SerializeStructVariant = RecordBuilder;

    fn serialize_bool(self, v: bool) -> Result<Value, ValueError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, ValueError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, ValueError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, ValueError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, ValueError> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, ValueError> {
        Ok(i64::try_from(v).map_or_else(|_| Value::Str(v.to_string()), Value::Int))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, ValueError> {
        Ok(Value::Uint(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, ValueError> {
        Ok(Value::Uint(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, ValueError> {
        Ok(Value::Uint(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, ValueError> {
        Ok(Value::Uint(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, ValueError> {
        Ok(u64::try_from(v).map_or_else(|_| Value::Str(v.to_string()), Value::Uint))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, ValueError> {
        Ok(Value::Float(widen_f32(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, ValueError> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, ValueError> {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, ValueError> {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, ValueError> {
        Ok(Value::seq(v.iter().copied()))
    }

    fn serialize_none(self) -> Result<Value, ValueError> {
        Ok(Value::Nil)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value, ValueError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, ValueError> {
        Ok(Value::Nil)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value, ValueError> {
        Ok(Value::Str(name.to_string()))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, ValueError> {
        Ok(Value::Str(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Value, ValueError> {
        Ok(Value::named(name, value.serialize(self)?))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, ValueError> {
        Ok(Value::named(variant, value.serialize(self)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, ValueError> {
        Ok(SeqBuilder::new(None, len))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, ValueError> {
        Ok(SeqBuilder::new(None, Some(len)))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, ValueError> {
        Ok(SeqBuilder::new(None, Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, ValueError> {
        Ok(SeqBuilder::new(Some(variant), Some(len)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder, ValueError> {
        Ok(MapBuilder {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<RecordBuilder, ValueError> {
        Ok(RecordBuilder::new(name, len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<RecordBuilder, ValueError> {
        Ok(RecordBuilder::new(variant, len))
    }
}

/// Collects sequences, tuples and tuple variants.
pub struct SeqBuilder {
    variant: Option<&'static str>,
    items: Vec<Value>,
}

impl SeqBuilder {
    fn new(variant: Option<&'static str>, len: Option<usize>) -> Self {
        Self {
            variant,
            items: Vec::with_capacity(len.unwrap_or(0)),
        }
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ValueError> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        let seq = Value::Seq(self.items);
        match self.variant {
            Some(variant) => Value::named(variant, seq),
            None => seq,
        }
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ValueError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ValueError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ValueError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SeqBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ValueError> {
        self.push(value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(self.finish())
    }
}

/// Collects map entries in serialization order.
pub struct MapBuilder {
    entries: Vec<(Value, Value)>,
    pending_key: Option<Value>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), ValueError> {
        self.pending_key = Some(to_value(key)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ValueError> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| ValueError("map value serialized before its key".to_string()))?;
        self.entries.push((key, to_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(Value::Map(self.entries))
    }
}

/// Collects struct and struct-variant fields into a [`Record`].
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    fn new(name: &'static str, len: usize) -> Self {
        Self {
            record: Record {
                name: name.to_string(),
                fields: Vec::with_capacity(len),
            },
        }
    }

    fn push<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), ValueError> {
        self.record.fields.push((key.to_string(), to_value(value)?));
        Ok(())
    }
}

impl ser::SerializeStruct for RecordBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), ValueError> {
        self.push(key, value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(Value::Record(self.record))
    }
}

impl ser::SerializeStructVariant for RecordBuilder {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), ValueError> {
        self.push(key, value)
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(Value::Record(self.record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Address {
        city: String,
    }

    #[derive(Serialize)]
    struct User {
        name: String,
        age: u32,
        address: Option<Address>,
    }

    #[derive(Serialize)]
    struct Meters(f64);

    #[derive(Serialize)]
    enum Shape {
        Point,
        Circle(f64),
        Rect { w: i32, h: i32 },
        Line(i32, i32),
    }

    #[test]
    fn test_struct_becomes_named_record() {
        let value = to_value(&User {
            name: "Ada".into(),
            age: 36,
            address: Some(Address {
                city: "London".into(),
            }),
        })
        .unwrap();

        let Value::Record(record) = &value else {
            panic!("expected record, got {:?}", value);
        };
        assert_eq!(record.name, "User");
        assert_eq!(record.get("age"), Some(&Value::Uint(36)));
        assert_eq!(
            value.field("address").and_then(|a| a.field("city")),
            Some(&Value::from("London"))
        );
    }

    #[test]
    fn test_none_becomes_nil() {
        let value = to_value(&User {
            name: "Bob".into(),
            age: 1,
            address: None,
        })
        .unwrap();
        assert_eq!(value.field("address"), Some(&Value::Nil));
    }

    #[test]
    fn test_newtype_keeps_name() {
        let value = to_value(&Meters(1.5)).unwrap();
        assert_eq!(value.type_name(), Some("Meters"));
        assert_eq!(value.peel(), &Value::Float(1.5));
    }

    #[test]
    fn test_enum_variants() {
        assert_eq!(to_value(&Shape::Point).unwrap(), Value::from("Point"));
        assert_eq!(
            to_value(&Shape::Circle(2.0)).unwrap(),
            Value::named("Circle", 2.0)
        );
        assert_eq!(
            to_value(&Shape::Line(1, 2)).unwrap(),
            Value::named("Line", Value::seq([1, 2]))
        );
        let rect = to_value(&Shape::Rect { w: 3, h: 4 }).unwrap();
        assert_eq!(rect.type_name(), Some("Rect"));
        assert_eq!(rect.field("h"), Some(&Value::Int(4)));
    }

    #[test]
    fn test_maps_keep_serialization_order() {
        let mut map = BTreeMap::new();
        map.insert("b", 2);
        map.insert("a", 1);
        let value = to_value(&map).unwrap();
        assert_eq!(value, Value::map([("a", 1), ("b", 2)]));
    }

    #[test]
    fn test_f32_widening_keeps_short_form() {
        assert_eq!(to_value(&0.1f32).unwrap(), Value::Float(0.1));
    }

    #[test]
    fn test_large_integers_fall_back_to_text() {
        assert_eq!(
            to_value(&u128::MAX).unwrap(),
            Value::Str(u128::MAX.to_string())
        );
        assert_eq!(to_value(&5i128).unwrap(), Value::Int(5));
    }
}
