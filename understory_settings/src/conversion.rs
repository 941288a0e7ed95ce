// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion between properties and [`Variant`]s.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use hashbrown::HashMap;
use understory_property::{
    Color, Property, PropertyId, PropertyRegistry, SetValueError, StringMetadata, Value, ValueRef,
};
use understory_units::{Quantity, QuantityParseError, Unit, UnitSchema, parse_quantity, translate};

use crate::variant::Variant;

/// Significant digits used when quantities are written as text.
pub const DEFAULT_DOUBLE_PRECISION: usize = 6;

/// Why a property could not be converted.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// The id does not refer to a live property.
    #[error("no property with id {0}")]
    UnknownProperty(PropertyId),
    /// The property kind has no textual form and no handler.
    #[error("conversion not implemented for {kind}")]
    Unsupported {
        /// Kind name of the property.
        kind: &'static str,
    },
    /// The variant has a shape the property cannot read.
    #[error("expected a {expected} variant, got {found}")]
    TypeMismatch {
        /// Shape the property needs.
        expected: &'static str,
        /// Shape that was stored.
        found: &'static str,
    },
    /// The quantity text is malformed.
    #[error("failed to parse quantity string '{text}': {source}")]
    InvalidQuantity {
        /// The stored text.
        text: String,
        /// Parser diagnostic.
        source: QuantityParseError,
    },
    /// The quantity text carries a unit of another dimension.
    #[error("unit mismatch with quantity string '{text}': expected {expected}, found {found}")]
    UnitMismatch {
        /// The stored text.
        text: String,
        /// Dimension of the property.
        expected: Unit,
        /// Dimension of the stored unit.
        found: Unit,
    },
    /// No item of the property's enumeration has this name.
    #[error("found no enumeration item for '{0}'")]
    UnknownEnumerationName(String),
    /// Color text is not `#RRGGBB`.
    #[error("not hexadecimal format '{0}'")]
    InvalidColor(String),
    /// Date-time text is not ISO-8601.
    #[error("invalid date-time '{0}'")]
    InvalidDateTime(String),
    /// A flat name/value list has an odd number of entries.
    #[error("metadata list needs name/value pairs, got {0} entries")]
    MalformedMetadataList(usize),
    /// A non-finite number cannot be written as quantity text.
    #[error("cannot format non-finite value {0}")]
    NotFinite(f64),
    /// The property refused the converted value.
    #[error(transparent)]
    Rejected(#[from] SetValueError),
}

/// Converts one concrete property kind.
///
/// Handlers are how kinds without a built-in textual form, such as points or
/// collaborator-defined kinds, take part in persistence.
pub trait ConversionHandler {
    /// Produces the stored form of `property`.
    fn to_variant(
        &self,
        property: &dyn Property,
        conversion: &PropertyValueConversion,
    ) -> Result<Variant, ConversionError>;

    /// Reads `variant` into a value `property` accepts.
    ///
    /// Must not assume the value will be applied.
    fn parse_variant(
        &self,
        property: &dyn Property,
        variant: &Variant,
        conversion: &PropertyValueConversion,
    ) -> Result<Value, ConversionError>;
}

/// Bidirectional converter between properties and [`Variant`]s.
///
/// Built-in kinds map as follows; handlers registered with
/// [`register_handler`](Self::register_handler) take precedence.
///
/// | Value                | Variant                                          |
/// |----------------------|--------------------------------------------------|
/// | bool, int, double    | same                                             |
/// | bytes, text, list    | same                                             |
/// | date-time            | date-time                                        |
/// | quantity             | text `"<number><symbol>"` in the unit schema     |
/// | enumeration          | text, the item name                              |
/// | color                | text `#RRGGBB`                                   |
/// | metadata list        | text list `[name0, value0, name1, value1, ...]`  |
/// | check state, point   | unsupported                                      |
///
/// Every failure is logged as `[property '<key>'] <cause>` before it is
/// returned.
///
/// ```rust
/// use understory_property::{PropertyQuantity, PropertyRegistry, TextId};
/// use understory_settings::{PropertyValueConversion, Variant};
/// use understory_units::UnitSchema;
///
/// let mut registry = PropertyRegistry::new();
/// let size = registry.insert(None, PropertyQuantity::length(TextId::new("Export", "size"), 25.4));
///
/// let si = PropertyValueConversion::new().with_double_precision(3);
/// let uk = si.clone().with_unit_schema(UnitSchema::ImperialUk);
/// let property = registry.get(size.id()).unwrap();
/// assert_eq!(si.to_variant(property), Ok(Variant::from("25.4mm")));
/// assert_eq!(uk.to_variant(property), Ok(Variant::from("1in")));
///
/// si.from_variant(&mut registry, size.id(), &Variant::from("2in")).unwrap();
/// assert_eq!(registry.value(size), Some(&50.8));
/// ```
pub struct PropertyValueConversion {
    unit_schema: UnitSchema,
    double_precision: usize,
    handlers: HashMap<TypeId, Rc<dyn ConversionHandler>>,
}

impl PropertyValueConversion {
    /// Creates a converter writing SI units with
    /// [`DEFAULT_DOUBLE_PRECISION`] digits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            unit_schema: UnitSchema::Si,
            double_precision: DEFAULT_DOUBLE_PRECISION,
            handlers: HashMap::new(),
        }
    }

    /// Sets the unit schema quantities are written in, builder style.
    #[must_use]
    pub fn with_unit_schema(mut self, schema: UnitSchema) -> Self {
        self.unit_schema = schema;
        self
    }

    /// Sets the significant digits of quantity text, builder style.
    #[must_use]
    pub fn with_double_precision(mut self, precision: usize) -> Self {
        self.double_precision = precision;
        self
    }

    /// Adds a handler for kind `P`, builder style.
    #[must_use]
    pub fn with_handler<P: Property>(mut self, handler: impl ConversionHandler + 'static) -> Self {
        self.register_handler::<P>(handler);
        self
    }

    /// Returns the unit schema quantities are written in.
    #[must_use]
    pub fn unit_schema(&self) -> UnitSchema {
        self.unit_schema
    }

    /// Sets the unit schema quantities are written in.
    pub fn set_unit_schema(&mut self, schema: UnitSchema) {
        self.unit_schema = schema;
    }

    /// Returns the significant digits of quantity text.
    #[must_use]
    pub fn double_precision(&self) -> usize {
        self.double_precision
    }

    /// Sets the significant digits of quantity text.
    pub fn set_double_precision(&mut self, precision: usize) {
        self.double_precision = precision;
    }

    /// Makes `handler` responsible for properties of kind `P`, replacing any
    /// previous handler for `P`.
    pub fn register_handler<P: Property>(&mut self, handler: impl ConversionHandler + 'static) {
        self.handlers.insert(TypeId::of::<P>(), Rc::new(handler));
    }

    /// Returns `true` if a handler is registered for the kind of `property`.
    #[must_use]
    pub fn has_handler(&self, property: &dyn Property) -> bool {
        self.handlers.contains_key(&property.kind_id())
    }

    /// Produces the stored form of `property`.
    pub fn to_variant(&self, property: &dyn Property) -> Result<Variant, ConversionError> {
        self.builtin_or_handler_to_variant(property)
            .map_err(|err| report(property, err))
    }

    /// Reads `variant` into a value `property` accepts, without applying it.
    pub fn parse_variant(
        &self,
        property: &dyn Property,
        variant: &Variant,
    ) -> Result<Value, ConversionError> {
        self.builtin_or_handler_parse(property, variant)
            .map_err(|err| report(property, err))
    }

    /// Reads `variant` into property `id` and assigns it.
    ///
    /// The property changes, and its group is notified, only if the whole
    /// conversion succeeds.
    pub fn from_variant(
        &self,
        registry: &mut PropertyRegistry,
        id: PropertyId,
        variant: &Variant,
    ) -> Result<(), ConversionError> {
        let Some(property) = registry.get(id) else {
            log::debug!("from_variant() on missing {id}");
            return Err(ConversionError::UnknownProperty(id));
        };
        let value = self.parse_variant(property, variant)?;
        if let Err(err) = registry.assign(id, value) {
            let err = ConversionError::Rejected(err);
            if let Some(property) = registry.get(id) {
                return Err(report(property, err));
            }
            return Err(err);
        }
        Ok(())
    }

    fn builtin_or_handler_to_variant(
        &self,
        property: &dyn Property,
    ) -> Result<Variant, ConversionError> {
        if let Some(handler) = self.handlers.get(&property.kind_id()) {
            return handler.to_variant(property, self);
        }
        let variant = match property.value_ref() {
            ValueRef::Bool(v) => Variant::Bool(v),
            ValueRef::Int(v) => Variant::Int(v),
            ValueRef::Double(v) => Variant::Double(v),
            ValueRef::Bytes(v) => Variant::Bytes(v.into()),
            ValueRef::Text(v) => Variant::Text(v.into()),
            ValueRef::TextList(v) => Variant::TextList(v.into()),
            ValueRef::DateTime(v) => Variant::DateTime(v),
            ValueRef::Color(v) => Variant::Text(v.to_hex()),
            ValueRef::Enumeration { value, enumeration } => {
                let name = enumeration
                    .name_of(value)
                    .ok_or(SetValueError::UnknownEnumerationValue(value))?;
                Variant::Text(name.into())
            }
            ValueRef::Quantity(q) => Variant::Text(self.quantity_text(q)?),
            ValueRef::MetadataList(list) => Variant::TextList(
                list.iter()
                    .flat_map(|m| [m.name.clone(), m.value.clone()])
                    .collect(),
            ),
            ValueRef::CheckState(_) | ValueRef::Point(_) | ValueRef::Custom(_) => {
                return Err(ConversionError::Unsupported {
                    kind: property.type_name(),
                });
            }
        };
        Ok(variant)
    }

    fn builtin_or_handler_parse(
        &self,
        property: &dyn Property,
        variant: &Variant,
    ) -> Result<Value, ConversionError> {
        if let Some(handler) = self.handlers.get(&property.kind_id()) {
            return handler.parse_variant(property, variant, self);
        }
        let mismatch = |expected: &'static str| ConversionError::TypeMismatch {
            expected,
            found: variant.kind_name(),
        };
        let value = match property.value_ref() {
            ValueRef::Bool(_) => Value::Bool(variant.to_bool().ok_or_else(|| mismatch("bool"))?),
            ValueRef::Int(_) => Value::Int(variant.to_int().ok_or_else(|| mismatch("int"))?),
            ValueRef::Double(_) => {
                Value::Double(variant.to_double().ok_or_else(|| mismatch("double"))?)
            }
            ValueRef::Bytes(_) => Value::Bytes(variant.to_bytes().ok_or_else(|| mismatch("bytes"))?),
            ValueRef::Text(_) => Value::Text(variant.to_text().ok_or_else(|| mismatch("text"))?),
            ValueRef::TextList(_) => {
                Value::TextList(variant.to_text_list().ok_or_else(|| mismatch("text list"))?)
            }
            ValueRef::DateTime(_) => match variant.to_date_time() {
                Some(v) => Value::DateTime(v),
                None => {
                    return Err(match variant.to_text() {
                        Some(text) => ConversionError::InvalidDateTime(text),
                        None => mismatch("date-time"),
                    });
                }
            },
            ValueRef::Color(_) => {
                let text = variant.to_text().ok_or_else(|| mismatch("text"))?;
                let color = Color::from_hex(text.trim())
                    .ok_or(ConversionError::InvalidColor(text))?;
                Value::Color(color)
            }
            ValueRef::Enumeration { enumeration, .. } => {
                let name = variant.to_text().ok_or_else(|| mismatch("text"))?;
                let item = enumeration
                    .find_by_name(&name)
                    .ok_or(ConversionError::UnknownEnumerationName(name))?;
                Value::Enumeration(item.value)
            }
            ValueRef::Quantity(q) => {
                let text = variant.to_text().ok_or_else(|| mismatch("text"))?;
                Value::Quantity(parse_quantity_text(text, q.unit())?)
            }
            ValueRef::MetadataList(_) => {
                let list = variant
                    .to_text_list()
                    .ok_or_else(|| mismatch("text list"))?;
                if list.len() % 2 != 0 {
                    return Err(ConversionError::MalformedMetadataList(list.len()));
                }
                let mut entries = Vec::with_capacity(list.len() / 2);
                let mut list = list.into_iter();
                while let (Some(name), Some(value)) = (list.next(), list.next()) {
                    entries.push(StringMetadata { name, value });
                }
                Value::MetadataList(entries)
            }
            ValueRef::CheckState(_) | ValueRef::Point(_) | ValueRef::Custom(_) => {
                return Err(ConversionError::Unsupported {
                    kind: property.type_name(),
                });
            }
        };
        Ok(value)
    }

    fn quantity_text(&self, q: Quantity) -> Result<String, ConversionError> {
        translate(self.unit_schema, q.value(), q.unit())
            .to_text(self.double_precision)
            .ok_or(ConversionError::NotFinite(q.value()))
    }
}

/// Parses quantity text for a property of dimension `unit`.
///
/// Text without a symbol is taken in the internal unit. A symbol of the same
/// dimension is converted; one of another dimension is refused.
fn parse_quantity_text(text: String, unit: Unit) -> Result<Quantity, ConversionError> {
    let parsed = match parse_quantity(&text) {
        Ok(parsed) => parsed,
        Err(source) => return Err(ConversionError::InvalidQuantity { text, source }),
    };
    if parsed.has_unit() && parsed.unit != unit {
        return Err(ConversionError::UnitMismatch {
            text,
            expected: unit,
            found: parsed.unit,
        });
    }
    Ok(Quantity::new(parsed.internal_value(), unit))
}

fn report(property: &dyn Property, err: ConversionError) -> ConversionError {
    log::error!("[property '{}'] {err}", property.name().key());
    err
}

impl Default for PropertyValueConversion {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PropertyValueConversion {
    fn clone(&self) -> Self {
        Self {
            unit_schema: self.unit_schema,
            double_precision: self.double_precision,
            handlers: self.handlers.clone(),
        }
    }
}

impl fmt::Debug for PropertyValueConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyValueConversion")
            .field("unit_schema", &self.unit_schema)
            .field("double_precision", &self.double_precision)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::sync::Arc;
    use alloc::vec;
    use understory_property::{
        CheckState, CustomValue, Enumeration, Point3, PropertyBase, PropertyBool, PropertyCheckState,
        PropertyColor, PropertyDouble, PropertyEnumeration, PropertyInt, PropertyMetadataList,
        PropertyPoint, PropertyQuantity, PropertyText, TextId, TypedProperty,
    };

    fn id(key: &'static str) -> TextId {
        TextId::from_static("Test", key)
    }

    fn round_trip(registry: &mut PropertyRegistry, id: PropertyId) -> Variant {
        round_trip_with(&PropertyValueConversion::new(), registry, id)
    }

    fn round_trip_with(
        conv: &PropertyValueConversion,
        registry: &mut PropertyRegistry,
        id: PropertyId,
    ) -> Variant {
        let variant = conv.to_variant(registry.get(id).unwrap()).unwrap();
        conv.from_variant(registry, id, &variant).unwrap();
        variant
    }

    #[test]
    fn scalars_round_trip_exactly() {
        let mut registry = PropertyRegistry::new();
        let b = registry.insert(None, PropertyBool::new(id("b"), true));
        let i = registry.insert(None, PropertyInt::new(id("i"), -42));
        let d = registry.insert(None, PropertyDouble::new(id("d"), 0.1 + 0.2));
        let t = registry.insert(None, PropertyText::new(id("t"), "héllo".into()));

        assert_eq!(round_trip(&mut registry, b.id()), Variant::Bool(true));
        assert_eq!(round_trip(&mut registry, i.id()), Variant::Int(-42));
        round_trip(&mut registry, d.id());
        round_trip(&mut registry, t.id());
        assert_eq!(registry.value(d), Some(&(0.1 + 0.2)));
        assert_eq!(registry.value(t).map(String::as_str), Some("héllo"));
    }

    #[test]
    fn color_is_hex_text() {
        let mut registry = PropertyRegistry::new();
        let c = registry.insert(None, PropertyColor::new(id("c"), Color::new(0x12, 0xab, 0xff)));
        let conv = PropertyValueConversion::new();
        assert_eq!(
            conv.to_variant(registry.get(c.id()).unwrap()),
            Ok(Variant::from("#12ABFF"))
        );

        assert_eq!(
            conv.from_variant(&mut registry, c.id(), &Variant::from("blue")),
            Err(ConversionError::InvalidColor("blue".into()))
        );
        conv.from_variant(&mut registry, c.id(), &Variant::from("#000001"))
            .unwrap();
        assert_eq!(registry.value(c), Some(&Color::new(0, 0, 1)));
    }

    #[test]
    fn enumeration_is_stored_by_name() {
        let mut registry = PropertyRegistry::new();
        let e = Arc::new(
            Enumeration::new()
                .with_item(10, id("Json"))
                .with_item(20, id("Binary")),
        );
        let p = registry.insert(None, PropertyEnumeration::new(id("format"), e, 20));
        let conv = PropertyValueConversion::new();
        assert_eq!(
            conv.to_variant(registry.get(p.id()).unwrap()),
            Ok(Variant::from("Binary"))
        );

        assert_eq!(
            conv.from_variant(&mut registry, p.id(), &Variant::from("Xml")),
            Err(ConversionError::UnknownEnumerationName("Xml".into()))
        );
        assert_eq!(registry.value(p), Some(&20));
        conv.from_variant(&mut registry, p.id(), &Variant::from("Json"))
            .unwrap();
        assert_eq!(registry.value(p), Some(&10));
    }

    #[test]
    fn quantity_units() {
        let mut registry = PropertyRegistry::new();
        let len = registry.insert(None, PropertyQuantity::length(id("len"), 25.4));
        let conv = PropertyValueConversion::new().with_double_precision(3);
        assert_eq!(
            conv.to_variant(registry.get(len.id()).unwrap()),
            Ok(Variant::from("25.4mm"))
        );

        // Same dimension converts, no unit means the internal unit.
        conv.from_variant(&mut registry, len.id(), &Variant::from("1in"))
            .unwrap();
        assert_eq!(registry.value(len), Some(&25.4));
        conv.from_variant(&mut registry, len.id(), &Variant::from(12.5))
            .unwrap();
        assert_eq!(registry.value(len), Some(&12.5));

        // Other dimensions and garbage are refused without touching the value.
        assert!(matches!(
            conv.from_variant(&mut registry, len.id(), &Variant::from("90°")),
            Err(ConversionError::UnitMismatch {
                expected: Unit::Length,
                found: Unit::Angle,
                ..
            })
        ));
        assert!(matches!(
            conv.from_variant(&mut registry, len.id(), &Variant::from("1,5mm")),
            Err(ConversionError::InvalidQuantity { .. })
        ));
        assert_eq!(registry.value(len), Some(&12.5));
    }

    #[test]
    fn non_finite_quantity_cannot_be_written() {
        let mut registry = PropertyRegistry::new();
        let len = registry.insert(None, PropertyQuantity::length(id("len"), f64::INFINITY));
        let conv = PropertyValueConversion::new();
        assert_eq!(
            conv.to_variant(registry.get(len.id()).unwrap()),
            Err(ConversionError::NotFinite(f64::INFINITY))
        );
    }

    #[test]
    fn range_violation_is_rejected_after_parsing() {
        let mut registry = PropertyRegistry::new();
        let p = registry.insert(None, PropertyInt::new(id("n"), 1).with_range(0, 10));
        let conv = PropertyValueConversion::new();
        assert_eq!(
            conv.from_variant(&mut registry, p.id(), &Variant::Int(11)),
            Err(ConversionError::Rejected(SetValueError::OutOfRange(11.0)))
        );
        assert_eq!(registry.value(p), Some(&1));
    }

    #[test]
    fn metadata_list_is_flattened() {
        let mut registry = PropertyRegistry::new();
        let m = registry.insert(
            None,
            PropertyMetadataList::new(
                id("meta"),
                vec![
                    StringMetadata::new("author", "me"),
                    StringMetadata::new("tool", "cad"),
                ],
            ),
        );
        let conv = PropertyValueConversion::new();
        let variant = conv.to_variant(registry.get(m.id()).unwrap()).unwrap();
        assert_eq!(
            variant,
            Variant::TextList(vec!["author".into(), "me".into(), "tool".into(), "cad".into()])
        );

        let odd = Variant::TextList(vec!["author".into()]);
        assert_eq!(
            conv.from_variant(&mut registry, m.id(), &odd),
            Err(ConversionError::MalformedMetadataList(1))
        );
        conv.from_variant(&mut registry, m.id(), &Variant::TextList(Vec::new()))
            .unwrap();
        assert!(registry.value(m).unwrap().is_empty());
    }

    #[test]
    fn kinds_without_text_form_are_unsupported() {
        let mut registry = PropertyRegistry::new();
        let point = registry.insert(None, PropertyPoint::new(id("pnt"), Point3::default()));
        let check = registry.insert(None, PropertyCheckState::new(id("chk"), CheckState::Checked));
        let conv = PropertyValueConversion::new();
        assert_eq!(
            conv.to_variant(registry.get(point.id()).unwrap()),
            Err(ConversionError::Unsupported {
                kind: "PropertyPoint"
            })
        );
        assert_eq!(
            conv.from_variant(&mut registry, check.id(), &Variant::Int(1)),
            Err(ConversionError::Unsupported {
                kind: "PropertyCheckState"
            })
        );
    }

    #[test]
    fn missing_property() {
        let mut registry = PropertyRegistry::new();
        let conv = PropertyValueConversion::new();
        let ghost = PropertyId::new(9);
        assert_eq!(
            conv.from_variant(&mut registry, ghost, &Variant::Bool(true)),
            Err(ConversionError::UnknownProperty(ghost))
        );
    }

    struct PointAsList;

    impl ConversionHandler for PointAsList {
        fn to_variant(
            &self,
            property: &dyn Property,
            _: &PropertyValueConversion,
        ) -> Result<Variant, ConversionError> {
            let p = property
                .downcast_ref::<PropertyPoint>()
                .map(|p| *p.get())
                .ok_or(ConversionError::Unsupported { kind: "point" })?;
            Ok(Variant::TextList(vec![
                p.x.to_string(),
                p.y.to_string(),
                p.z.to_string(),
            ]))
        }

        fn parse_variant(
            &self,
            _: &dyn Property,
            variant: &Variant,
            _: &PropertyValueConversion,
        ) -> Result<Value, ConversionError> {
            let coords: Option<Vec<f64>> = variant
                .to_text_list()
                .map(|l| l.iter().filter_map(|c| c.parse().ok()).collect());
            match coords.as_deref() {
                Some(&[x, y, z]) => Ok(Value::Point(Point3::new(x, y, z))),
                _ => Err(ConversionError::TypeMismatch {
                    expected: "three coordinates",
                    found: variant.kind_name(),
                }),
            }
        }
    }

    #[test]
    fn handler_extends_builtin_kinds() {
        let mut registry = PropertyRegistry::new();
        let point = registry.insert(None, PropertyPoint::new(id("pnt"), Point3::new(1.0, 2.5, -3.0)));
        let conv = PropertyValueConversion::new().with_handler::<PropertyPoint>(PointAsList);
        assert!(conv.has_handler(registry.get(point.id()).unwrap()));

        let variant = round_trip_with(&conv, &mut registry, point.id());
        assert_eq!(
            variant,
            Variant::TextList(vec!["1".into(), "2.5".into(), "-3".into()])
        );
        assert_eq!(registry.value(point), Some(&Point3::new(1.0, 2.5, -3.0)));
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Placement(i32);

    #[derive(Debug)]
    struct PropertyPlacement {
        base: PropertyBase,
        value: CustomValue,
    }

    impl Property for PropertyPlacement {
        fn base(&self) -> &PropertyBase {
            &self.base
        }
        fn base_mut(&mut self) -> &mut PropertyBase {
            &mut self.base
        }
        fn type_name(&self) -> &'static str {
            "PropertyPlacement"
        }
        fn value_ref(&self) -> ValueRef<'_> {
            ValueRef::Custom(&self.value)
        }
        fn try_assign(&mut self, value: Value) -> Result<(), SetValueError> {
            match value {
                Value::Custom(v) if v.is::<Placement>() => {
                    self.value = v;
                    Ok(())
                }
                other => Err(SetValueError::TypeMismatch {
                    expected: "custom",
                    found: other.kind_name(),
                }),
            }
        }
        fn restore_default(&mut self) {
            self.value = CustomValue::new(Placement(0));
        }
    }

    struct PlacementAsInt;

    impl ConversionHandler for PlacementAsInt {
        fn to_variant(
            &self,
            property: &dyn Property,
            _: &PropertyValueConversion,
        ) -> Result<Variant, ConversionError> {
            match property.value_ref() {
                ValueRef::Custom(v) => Ok(Variant::Int(
                    v.downcast_ref::<Placement>().map_or(0, |p| i64::from(p.0)),
                )),
                _ => Err(ConversionError::Unsupported { kind: "placement" }),
            }
        }

        fn parse_variant(
            &self,
            _: &dyn Property,
            variant: &Variant,
            _: &PropertyValueConversion,
        ) -> Result<Value, ConversionError> {
            let v = variant
                .to_int()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or(ConversionError::TypeMismatch {
                    expected: "int",
                    found: variant.kind_name(),
                })?;
            Ok(Value::Custom(CustomValue::new(Placement(v))))
        }
    }

    #[test]
    fn collaborator_kind_persists_through_handler() {
        let mut registry = PropertyRegistry::new();
        let placement = registry.insert(
            None,
            PropertyPlacement {
                base: PropertyBase::new(id("placement")),
                value: CustomValue::new(Placement(7)),
            },
        );
        let plain = PropertyValueConversion::new();
        assert!(plain.to_variant(registry.get(placement.id()).unwrap()).is_err());

        let conv = plain.with_handler::<PropertyPlacement>(PlacementAsInt);
        assert_eq!(
            conv.to_variant(registry.get(placement.id()).unwrap()),
            Ok(Variant::Int(7))
        );
        conv.from_variant(&mut registry, placement.id(), &Variant::Int(-2))
            .unwrap();
        assert_eq!(
            registry.get(placement.id()).unwrap().value_ref(),
            ValueRef::Custom(&CustomValue::new(Placement(-2)))
        );
    }
}
