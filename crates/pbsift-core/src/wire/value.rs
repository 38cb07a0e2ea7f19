//! Decoded content tree.

use std::collections::BTreeMap;

use bytes::Bytes;

/// One decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    /// Raw length-delimited data (zero-copy slice of the payload).
    Bytes(Bytes),
    Message(Message),
    /// Repeated occurrences of one field, in wire order.
    Repeated(Vec<Value>),
}

/// Field number -> value, ordered by field number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message(BTreeMap<u32, Value>);

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field_number: u32) -> Option<&Value> {
        self.0.get(&field_number)
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, field_number: u32, value: Value) -> Option<Value> {
        self.0.insert(field_number, value)
    }

    /// Append one wire occurrence; a second occurrence turns the field into
    /// `Value::Repeated`.
    pub fn push(&mut self, field_number: u32, value: Value) {
        match self.0.remove(&field_number) {
            None => {
                self.0.insert(field_number, value);
            }
            Some(Value::Repeated(mut items)) => {
                items.push(value);
                self.0.insert(field_number, Value::Repeated(items));
            }
            Some(first) => {
                self.0.insert(field_number, Value::Repeated(vec![first, value]));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Value)> {
        self.0.iter().map(|(n, v)| (*n, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_collects_repeats_in_order() {
        let mut msg = Message::new();
        msg.push(1, Value::Int(1));
        msg.push(2, Value::Int(9));
        msg.push(1, Value::Int(2));
        msg.push(1, Value::Int(3));

        assert_eq!(
            msg.get(1),
            Some(&Value::Repeated(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
        );
        assert_eq!(msg.get(2), Some(&Value::Int(9)));
    }
}
