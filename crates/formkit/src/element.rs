//! # Element Capabilities
//!
//! The minimal surface the extractor needs from a form and its input
//! elements. A browser binding implements these over DOM nodes; the
//! [`headless`](crate::headless) module implements them in memory.
//!
//! Marking is done through `&self`: UI handles are shared references and
//! implementors use interior mutability for the marker.

use crate::convert::Datatype;

/// Attribute holding the field name.
pub const NAME_ATTRIBUTE: &str = "name";
/// Attribute holding the element id, used when `name` is absent.
pub const ID_ATTRIBUTE: &str = "id";
/// Attribute holding the input type (`checkbox`, `radio`, ...).
pub const TYPE_ATTRIBUTE: &str = "type";

/// An input, select or textarea element.
pub trait FormElement {
    /// Returns the value of an attribute, or `None` if it is not set.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Returns the current textual value.
    fn value(&self) -> String;

    /// Returns whether a checkbox or radio button is checked.
    fn is_checked(&self) -> bool;

    /// Sets or clears the element's error marker.
    fn set_error_marker(&self, failed: bool);
}

/// A form: an attribute holder that owns input elements.
pub trait Form {
    /// Element type yielded by [`Form::elements`].
    type Element: FormElement;

    /// Returns the value of a form attribute, or `None` if it is not set.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Returns every input, select and textarea element in document order.
    fn elements(&self) -> Vec<&Self::Element>;
}

/// How an element's value is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// `type="checkbox"`: the value is the checked state.
    Checkbox,
    /// `type="radio"`: contributes only when selected.
    Radio,
    /// Anything else: the value is the element's text.
    Text,
}

impl InputKind {
    /// Classify an element by its `type` attribute (case-insensitive).
    pub fn of<E: FormElement + ?Sized>(element: &E) -> Self {
        match element.attribute(TYPE_ATTRIBUTE) {
            Some(t) if t.eq_ignore_ascii_case("checkbox") => Self::Checkbox,
            Some(t) if t.eq_ignore_ascii_case("radio") => Self::Radio,
            _ => Self::Text,
        }
    }

    /// Datatype used when the element carries no datatype attribute.
    pub fn default_datatype(&self) -> Datatype {
        match self {
            Self::Checkbox => Datatype::Boolean,
            Self::Radio | Self::Text => Datatype::String,
        }
    }
}

/// Read an attribute, treating an empty value as absent.
pub(crate) fn non_empty_attribute<E: FormElement + ?Sized>(element: &E, name: &str) -> Option<String> {
    element.attribute(name).filter(|v| !v.is_empty())
}
