use std::fmt::Display;
use std::sync::Arc;

use log::debug;

use self::field::Field;
use self::record_id::RecordId;
use self::schema::TupleDesc;
use crate::error::{Error, Result};

pub mod field;
pub mod record_id;
pub mod schema;

/// A single row bound to a schema.
///
/// The schema is shared, every tuple of a relation points at the same
/// `TupleDesc`. Each slot is either unset (`None`) or holds a field whose type
/// matches the schema's type for that position. The record id is absent until
/// the storage layer assigns one.
#[derive(Clone, Debug, PartialEq)]
pub struct Tuple {
    schema: Arc<TupleDesc>,
    fields: Vec<Option<Field>>,
    record_id: Option<RecordId>,
}

impl Tuple {
    /// Creates a tuple with all fields unset.
    pub fn new(schema: Arc<TupleDesc>) -> Result<Self> {
        if schema.num_fields() == 0 {
            return Err(Error::Schema(
                "cannot create a tuple for a schema without fields".to_owned(),
            ));
        }
        let fields = vec![None; schema.num_fields()];
        Ok(Self {
            schema,
            fields,
            record_id: None,
        })
    }

    /// Creates a tuple with every field set, validating each value like `set_field`.
    pub fn from_fields(schema: Arc<TupleDesc>, fields: Vec<Field>) -> Result<Self> {
        if fields.len() != schema.num_fields() {
            return Err(Error::Schema(format!(
                "expected {} values but got {}",
                schema.num_fields(),
                fields.len()
            )));
        }
        let mut tuple = Self::new(schema)?;
        for (i, field) in fields.into_iter().enumerate() {
            tuple.set_field(i, field)?;
        }
        Ok(tuple)
    }

    pub fn tuple_desc(&self) -> &Arc<TupleDesc> {
        &self.schema
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    pub fn set_record_id(&mut self, record_id: RecordId) {
        self.record_id = Some(record_id);
    }

    /// Stores `field` at position `i`, replacing whatever was there.
    /// On error the tuple is left unchanged.
    pub fn set_field(&mut self, i: usize, field: Field) -> Result<()> {
        let expected = self.schema.field_type(i)?;
        let actual = field.type_of();
        if expected != actual {
            return Err(Error::TypeMismatch {
                index: i,
                expected,
                actual,
            });
        }
        self.fields[i] = Some(field);
        Ok(())
    }

    /// Returns `Ok(None)` if the field at `i` has not been set yet.
    pub fn field(&self, i: usize) -> Result<Option<&Field>> {
        self.fields
            .get(i)
            .map(Option::as_ref)
            .ok_or(Error::IndexOutOfRange {
                index: i,
                len: self.fields.len(),
            })
    }

    /// Iterates over the slots in schema order. The borrow keeps the tuple
    /// from being modified while iterating.
    pub fn fields(&self) -> impl Iterator<Item = Option<&Field>> + Clone + '_ {
        self.fields.iter().map(Option::as_ref)
    }

    pub fn is_complete(&self) -> bool {
        self.fields.iter().all(Option::is_some)
    }

    /// Binds the tuple to another schema with the same number of fields, e.g.
    /// after a projection renamed the columns. Fields already set must agree
    /// with the types of the new schema.
    pub fn reset_tuple_desc(&mut self, schema: Arc<TupleDesc>) -> Result<()> {
        if schema.num_fields() != self.fields.len() {
            return Err(Error::Schema(format!(
                "cannot rebind a tuple of {} fields to a schema of {} fields",
                self.fields.len(),
                schema.num_fields()
            )));
        }
        for (index, (field, expected)) in self.fields.iter().zip(schema.types()).enumerate() {
            if let Some(field) = field {
                let actual = field.type_of();
                if actual != expected {
                    return Err(Error::TypeMismatch {
                        index,
                        expected,
                        actual,
                    });
                }
            }
        }
        debug!("Rebinding tuple from [{}] to [{}]", self.schema, schema);
        self.schema = schema;
        Ok(())
    }
}

/// Fields separated by tabs and terminated by a newline. Unset fields render empty.
/// String fields never contain tabs or line breaks, so the separators are unambiguous.
impl Display for Tuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, field) in self.fields().enumerate() {
            if i > 0 {
                write!(f, "\t")?;
            }
            if let Some(field) = field {
                write!(f, "{}", field)?;
            }
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lazy_static::lazy_static;
    use rand::Rng;

    use super::field::Field;
    use super::record_id::RecordId;
    use super::schema::{TupleDesc, Type};
    use super::Tuple;
    use crate::error::Error;

    lazy_static! {
        static ref TEST_SCHEMA: Arc<TupleDesc> = Arc::new(
            TupleDesc::new(vec![Type::Int, Type::String(20)], vec!["id", "name"]).unwrap()
        );
    }

    fn alice() -> Tuple {
        let mut tuple = Tuple::new(Arc::clone(&TEST_SCHEMA)).unwrap();
        tuple.set_field(0, Field::Int(7)).unwrap();
        tuple
            .set_field(1, Field::string("alice", 20).unwrap())
            .unwrap();
        tuple
    }

    #[test]
    fn new_tuple_is_unset() {
        let tuple = Tuple::new(Arc::clone(&TEST_SCHEMA)).unwrap();
        assert_eq!(tuple.num_fields(), TEST_SCHEMA.num_fields());
        for i in 0..tuple.num_fields() {
            assert_eq!(tuple.field(i), Ok(None));
        }
        assert!(tuple.record_id().is_none());
        assert!(!tuple.is_complete());
        assert!(Arc::ptr_eq(tuple.tuple_desc(), &TEST_SCHEMA));
    }

    #[test]
    fn can_set_and_get_fields() {
        let tuple = alice();
        assert_eq!(tuple.field(0), Ok(Some(&Field::Int(7))));
        assert_eq!(
            tuple.field(1).unwrap().and_then(|f| f.as_str()),
            Some("alice")
        );
        assert!(tuple.is_complete());

        let mut rng = rand::thread_rng();
        let mut tuple = Tuple::new(Arc::clone(&TEST_SCHEMA)).unwrap();
        for _ in 0..20 {
            let value: i32 = rng.gen();
            tuple.set_field(0, Field::Int(value)).unwrap();
            assert_eq!(tuple.field(0), Ok(Some(&Field::Int(value))));
        }
    }

    #[test]
    fn failed_set_leaves_tuple_unchanged() {
        let mut tuple = alice();
        let before = tuple.clone();

        assert_eq!(
            tuple.set_field(2, Field::Int(1)),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            tuple.set_field(0, Field::string("7", 20).unwrap()),
            Err(Error::TypeMismatch {
                index: 0,
                expected: Type::Int,
                actual: Type::String(20)
            })
        );
        assert!(matches!(
            tuple.set_field(1, Field::string("alice", 5).unwrap()),
            Err(Error::TypeMismatch { index: 1, .. })
        ));
        assert_eq!(tuple, before);
        assert_eq!(
            tuple.field(2),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn can_build_from_fields() {
        let tuple = Tuple::from_fields(
            Arc::clone(&TEST_SCHEMA),
            vec![Field::Int(7), Field::string("alice", 20).unwrap()],
        )
        .unwrap();
        assert_eq!(tuple, alice());

        assert!(matches!(
            Tuple::from_fields(Arc::clone(&TEST_SCHEMA), vec![Field::Int(7)]),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            Tuple::from_fields(Arc::clone(&TEST_SCHEMA), vec![Field::Int(7), Field::Int(8)]),
            Err(Error::TypeMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn can_render_tuples() {
        assert_eq!(alice().to_string(), "7\talice\n");

        let mut partial = Tuple::new(Arc::clone(&TEST_SCHEMA)).unwrap();
        assert_eq!(partial.to_string(), "\t\n");
        partial
            .set_field(1, Field::string("bob", 20).unwrap())
            .unwrap();
        assert_eq!(partial.to_string(), "\tbob\n");

        let single = Arc::new(TupleDesc::single(Type::Int, "n"));
        let tuple = Tuple::from_fields(single, vec![Field::Int(-3)]).unwrap();
        assert_eq!(tuple.to_string(), "-3\n");
    }

    #[test]
    fn rendered_rows_split_back_into_fields() {
        let mut tuple = Tuple::new(Arc::clone(&TEST_SCHEMA)).unwrap();
        tuple.set_field(0, Field::Int(1)).unwrap();
        assert!(Field::string("al\tice", 20).is_err());
        tuple
            .set_field(1, Field::string("al ice", 20).unwrap())
            .unwrap();

        let rendered = tuple.to_string();
        assert_eq!(rendered.matches('\n').count(), 1);
        let line = rendered.strip_suffix('\n').unwrap();
        assert_eq!(line.split('\t').collect::<Vec<_>>(), vec!["1", "al ice"]);
    }

    #[test]
    fn fields_reflect_current_state() {
        let mut tuple = Tuple::new(Arc::clone(&TEST_SCHEMA)).unwrap();
        tuple.set_field(0, Field::Int(1)).unwrap();
        let fields: Vec<Option<&Field>> = tuple.fields().collect();
        assert_eq!(fields, vec![Some(&Field::Int(1)), None]);

        tuple.set_field(0, Field::Int(2)).unwrap();
        let iter = tuple.fields();
        assert_eq!(iter.clone().count(), 2);
        assert_eq!(iter.collect::<Vec<_>>()[0], Some(&Field::Int(2)));
    }

    #[test]
    fn can_set_record_id() {
        let mut tuple = alice();
        let rid = RecordId::new((10, 0), 3);
        tuple.set_record_id(rid);
        assert_eq!(tuple.record_id(), Some(rid));

        let moved = RecordId::new((10, 1), 0);
        tuple.set_record_id(moved);
        assert_eq!(tuple.record_id(), Some(moved));
        assert_eq!(rid, RecordId::new((10, 0), 3));
    }

    #[test]
    fn can_reset_tuple_desc() {
        let mut tuple = alice();
        let renamed = Arc::new(TEST_SCHEMA.with_prefix("people"));
        tuple.reset_tuple_desc(Arc::clone(&renamed)).unwrap();
        assert!(Arc::ptr_eq(tuple.tuple_desc(), &renamed));
        assert_eq!(tuple.field(0), Ok(Some(&Field::Int(7))));
        assert_eq!(tuple.tuple_desc().field_name(1), Ok("people.name"));

        let narrower = Arc::new(TupleDesc::unnamed(vec![Type::Int]).unwrap());
        assert!(matches!(
            tuple.reset_tuple_desc(narrower),
            Err(Error::Schema(_))
        ));
        let retyped = Arc::new(TupleDesc::unnamed(vec![Type::Int, Type::Int]).unwrap());
        assert!(matches!(
            tuple.reset_tuple_desc(retyped),
            Err(Error::TypeMismatch { index: 1, .. })
        ));
        assert!(Arc::ptr_eq(tuple.tuple_desc(), &renamed));
    }

    #[test]
    fn unset_fields_accept_any_schema_of_same_width() {
        let mut tuple = Tuple::new(Arc::clone(&TEST_SCHEMA)).unwrap();
        let ints = Arc::new(TupleDesc::unnamed(vec![Type::Int, Type::Int]).unwrap());
        tuple.set_field(0, Field::Int(1)).unwrap();
        tuple.reset_tuple_desc(Arc::clone(&ints)).unwrap();
        tuple.set_field(1, Field::Int(2)).unwrap();
        assert_eq!(tuple.to_string(), "1\t2\n");
    }
}
