//! Stack-based model builder
//!
//! Every start event creates an element of the kind implied by its tag (or by
//! the type discriminator for `eClassifiers` / `eStructuralFeatures`), fills it
//! from the attribute table, attaches it to the stack top through the model's
//! add-methods and pushes it. End events pop. The element popped off an empty
//! stack is the result.

use tracing::{debug, trace};

use super::attributes;
use super::events::{Attributes, Event};
use super::ParserConfig;
use crate::error::{EcoreError, Result};
use crate::model::{ElementId, ElementKind, Model};

/// What a start event pushed
#[derive(Debug, Clone, Copy)]
enum Frame {
    Element(ElementId),
    /// `details` entries edit their annotation in place
    Detail,
}

/// How a tag hooks a new element into its container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Subpackage,
    Classifier,
    Feature,
    Operation,
    Parameter,
    Literal,
    Annotation,
    TypeParameter,
    Bound,
    GenericType,
    GenericSuperType,
    TypeArgument,
    LowerBound,
    UpperBound,
}

/// Incremental builder over a borrowed model
pub struct Builder<'m> {
    model: &'m mut Model,
    stack: Vec<Frame>,
    result: Option<ElementId>,
    discriminator: String,
}

impl<'m> Builder<'m> {
    pub fn new(model: &'m mut Model) -> Self {
        Self::with_config(model, &ParserConfig::default())
    }

    pub fn with_config(model: &'m mut Model, config: &ParserConfig) -> Self {
        Self {
            model,
            stack: Vec::new(),
            result: None,
            discriminator: config.type_discriminator.clone(),
        }
    }

    /// Build one package from a complete event sequence
    pub fn build(
        model: &'m mut Model,
        events: impl IntoIterator<Item = Event>,
    ) -> Result<ElementId> {
        let mut builder = Self::new(model);
        for event in events {
            builder.handle(event)?;
        }
        builder.finish()
    }

    /// Like [`Builder::build`] for a fallible event source such as the XML adapter
    pub fn build_from<I>(
        model: &'m mut Model,
        config: &ParserConfig,
        events: I,
    ) -> Result<ElementId>
    where
        I: IntoIterator<Item = Result<Event>>,
    {
        let mut builder = Self::with_config(model, config);
        for event in events {
            builder.handle(event?)?;
        }
        builder.finish()
    }

    pub fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Start { tag, attributes } => self.start_element(&tag, &attributes),
            Event::End => self.end_element(),
        }
    }

    /// Depth of the construction stack
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn start_element(&mut self, tag: &str, attributes: &Attributes) -> Result<()> {
        trace!(tag, depth = self.stack.len(), "start element");
        if self.result.is_some() {
            return Err(EcoreError::UnbalancedEvents(format!(
                "<{}> after the root element was closed",
                tag
            )));
        }

        let parent = match self.stack.last() {
            None => None,
            Some(Frame::Element(id)) => Some(*id),
            Some(Frame::Detail) => {
                return Err(EcoreError::UnexpectedElement {
                    tag: tag.to_string(),
                    parent: Some("details".to_string()),
                })
            }
        };

        if tag == "details" {
            let annotation = parent.ok_or_else(|| self.unexpected(tag, None))?;
            self.add_detail(annotation, attributes)?;
            self.stack.push(Frame::Detail);
            return Ok(());
        }

        let (kind, slot) = self.classify(tag, attributes, parent)?;
        let id = self.model.create(kind);
        attributes::apply(self.model.get_mut(id), attributes, &self.discriminator)?;

        match (parent, slot) {
            (None, None) => {}
            (Some(parent), Some(slot)) => self.attach(parent, slot, id)?,
            (parent, _) => return Err(self.unexpected(tag, parent)),
        }
        self.stack.push(Frame::Element(id));
        Ok(())
    }

    pub fn end_element(&mut self) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| {
                EcoreError::UnbalancedEvents("end event without a matching start".into())
            })?;
        trace!(depth = self.stack.len(), "end element");
        if self.stack.is_empty() {
            if let Frame::Element(id) = frame {
                self.result = Some(id);
            }
        }
        Ok(())
    }

    /// Root package of a balanced event stream
    pub fn finish(self) -> Result<ElementId> {
        if !self.stack.is_empty() {
            return Err(EcoreError::UnbalancedEvents(format!(
                "{} element(s) left open",
                self.stack.len()
            )));
        }
        let root = self
            .result
            .ok_or_else(|| EcoreError::UnbalancedEvents("no root element".into()))?;
        debug!(
            package = %self.model.name(root),
            elements = self.model.len(),
            "built package"
        );
        Ok(root)
    }

    fn unexpected(&self, tag: &str, parent: Option<ElementId>) -> EcoreError {
        EcoreError::UnexpectedElement {
            tag: tag.to_string(),
            parent: parent.map(|p| self.model.kind(p).to_string()),
        }
    }

    /// Concrete kind for a start tag, and where it attaches (None for the root)
    fn classify(
        &self,
        tag: &str,
        attributes: &Attributes,
        parent: Option<ElementId>,
    ) -> Result<(ElementKind, Option<Slot>)> {
        let (kind, slot) = match tag {
            "EPackage" if parent.is_none() => return Ok((ElementKind::Package, None)),
            "EPackage" | "eSubpackages" => (ElementKind::Package, Slot::Subpackage),
            "eClassifiers" => match self.discriminated(tag, attributes)? {
                "EClass" => (ElementKind::Class, Slot::Classifier),
                "EDataType" => (ElementKind::DataType, Slot::Classifier),
                "EEnum" => (ElementKind::Enum, Slot::Classifier),
                other => return Err(self.unrecognized(tag, other)),
            },
            "eClasses" => (ElementKind::Class, Slot::Classifier),
            "eDataTypes" => (ElementKind::DataType, Slot::Classifier),
            "eEnums" => (ElementKind::Enum, Slot::Classifier),
            "eStructuralFeatures" => match self.discriminated(tag, attributes)? {
                "EAttribute" => (ElementKind::Attribute, Slot::Feature),
                "EReference" => (ElementKind::Reference, Slot::Feature),
                other => return Err(self.unrecognized(tag, other)),
            },
            "eAttributes" => (ElementKind::Attribute, Slot::Feature),
            "eReferences" => (ElementKind::Reference, Slot::Feature),
            "eOperations" => (ElementKind::Operation, Slot::Operation),
            "eParameters" => (ElementKind::Parameter, Slot::Parameter),
            "eLiterals" => (ElementKind::EnumLiteral, Slot::Literal),
            "eAnnotations" => (ElementKind::Annotation, Slot::Annotation),
            "eTypeParameters" => (ElementKind::TypeParameter, Slot::TypeParameter),
            "eBounds" => (ElementKind::GenericType, Slot::Bound),
            "eGenericType" => (ElementKind::GenericType, Slot::GenericType),
            "eGenericSuperTypes" => (ElementKind::GenericType, Slot::GenericSuperType),
            "eTypeArguments" => (ElementKind::GenericType, Slot::TypeArgument),
            "eLowerBound" => (ElementKind::GenericType, Slot::LowerBound),
            "eUpperBound" => (ElementKind::GenericType, Slot::UpperBound),
            _ => return Err(self.unexpected(tag, parent)),
        };
        if parent.is_none() {
            // documents must open with a package
            return Err(self.unexpected(tag, None));
        }
        Ok((kind, Some(slot)))
    }

    /// Discriminator value with any namespace prefix (`ecore:`) removed
    fn discriminated<'a>(&self, tag: &str, attributes: &'a Attributes) -> Result<&'a str> {
        let value = attributes
            .get(&self.discriminator)
            .ok_or_else(|| EcoreError::MissingDiscriminator { tag: tag.to_string() })?;
        Ok(value.rsplit_once(':').map(|(_, local)| local).unwrap_or(value))
    }

    fn unrecognized(&self, tag: &str, value: &str) -> EcoreError {
        EcoreError::UnrecognizedDiscriminator {
            tag: tag.to_string(),
            value: value.to_string(),
        }
    }

    fn attach(&mut self, parent: ElementId, slot: Slot, child: ElementId) -> Result<()> {
        let model = &mut *self.model;
        match slot {
            Slot::Subpackage => model.add_subpackage(parent, child),
            Slot::Classifier if model.kind(child) == ElementKind::Class => {
                model.add_class(parent, child)
            }
            Slot::Classifier => model.add_data_type(parent, child),
            Slot::Feature if model.kind(child) == ElementKind::Attribute => {
                model.add_attribute(parent, child)
            }
            Slot::Feature => model.add_reference(parent, child),
            Slot::Operation => model.add_operation(parent, child),
            Slot::Parameter => model.add_parameter(parent, child),
            Slot::Literal => model.add_literal(parent, child),
            Slot::Annotation => model.add_annotation(parent, child),
            Slot::TypeParameter => model.add_type_parameter(parent, child),
            Slot::Bound => model.add_bound(parent, child),
            Slot::GenericType => model.set_generic_type(parent, child),
            Slot::GenericSuperType => model.add_generic_super_type(parent, child),
            Slot::TypeArgument => model.add_type_argument(parent, child),
            Slot::LowerBound => model.set_lower_bound(parent, child),
            Slot::UpperBound => model.set_upper_bound(parent, child),
        }
    }

    fn add_detail(&mut self, annotation: ElementId, attributes: &Attributes) -> Result<()> {
        let mut key = None;
        let mut value = String::new();
        for (attribute, v) in attributes {
            match attribute.as_str() {
                "key" => key = Some(v.clone()),
                "value" => value = v.clone(),
                _ => {
                    return Err(EcoreError::UnexpectedAttribute {
                        attribute: attribute.clone(),
                        element: "details".to_string(),
                    })
                }
            }
        }
        let key = key.ok_or_else(|| EcoreError::InvalidAttributeValue {
            attribute: "key".to_string(),
            value: String::new(),
            expected: "a detail key",
        })?;
        self.model.add_detail(annotation, key, value)
    }
}
