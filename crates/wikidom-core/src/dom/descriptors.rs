//! Per-attribute-name strategy objects: validation, normalization mode,
//! removability and post-commit side effects.
//!
//! Every element kind resolves attribute names against its own descriptor
//! set first, then against the universal attributes, and finally against a
//! permissive generic descriptor. The descriptor set is a closed tagged
//! union, so dispatch is a match, not a vtable.

use super::elements::paragraph;
use super::{Dom, ElementTag, NodeId};
use crate::error::DomError;
use crate::result::Result;
use crate::text;
use std::fmt;
use std::str::FromStr;

/// Largest representable paragraph gap, in blank lines.
pub const MAX_GAP: u32 = 65535;

/// Attribute value normalization applied before verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// Leave the value untouched
    None,
    /// Standard attribute-value normalization: whitespace becomes spaces
    Cdata,
    /// CDATA normalization plus collapsing space runs and trimming ends
    NonCdata,
}

impl Normalization {
    pub fn apply(&self, value: &str) -> String {
        match self {
            Normalization::None => value.to_string(),
            Normalization::Cdata => text::normalize_cdata(value),
            Normalization::NonCdata => text::normalize_non_cdata(value),
        }
    }
}

/// Horizontal alignment values shared by block elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl HorizAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            HorizAlign::Left => "left",
            HorizAlign::Center => "center",
            HorizAlign::Right => "right",
            HorizAlign::Justify => "justify",
        }
    }
}

impl fmt::Display for HorizAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HorizAlign {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(HorizAlign::Left),
            "center" => Ok(HorizAlign::Center),
            "right" => Ok(HorizAlign::Right),
            "justify" => Ok(HorizAlign::Justify),
            _ => Err(DomError::must_be_one_of(TEXT_ALIGN, s)),
        }
    }
}

/// A length in pixels or percent, as used by `width` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Length {
    pub value: u32,
    pub unit: LengthUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Pixels,
    Percent,
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            LengthUnit::Pixels => write!(f, "{}", self.value),
            LengthUnit::Percent => write!(f, "{}%", self.value),
        }
    }
}

impl FromStr for Length {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self> {
        let (digits, unit) = match s.strip_suffix('%') {
            Some(digits) => (digits, LengthUnit::Percent),
            None => (s, LengthUnit::Pixels),
        };
        let value = digits.trim().parse::<u32>().map_err(|_| {
            DomError::invalid_argument(format!("`{s}` is not a valid length"))
        })?;
        Ok(Length { value, unit })
    }
}

const TEXT_ALIGN: &[&str] = &["left", "center", "right", "justify"];
const LCR_ALIGN: &[&str] = &["left", "center", "right"];
const I18N_DIR: &[&str] = &["ltr", "rtl"];
const NOSHADE: &[&str] = &["noshade"];

/// Attributes every element kind understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniversalAttr {
    Id,
    Class,
    Style,
    Title,
    Lang,
    Dir,
}

/// Paragraph-specific attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphAttr {
    Align,
    TopGap,
    BottomGap,
}

/// Horizontal-rule-specific attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAttr {
    Align,
    Noshade,
    Size,
    Width,
}

/// Strategy object for one attribute name on one element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeDescriptor {
    /// Fallback for unknown names; permissive about values
    Generic,
    Universal(UniversalAttr),
    Paragraph(ParagraphAttr),
    Rule(RuleAttr),
}

/// Resolve the descriptor for `name` on an element of kind `tag`.
pub(crate) fn lookup(tag: &ElementTag, name: &str) -> AttributeDescriptor {
    let specific = match tag {
        ElementTag::Paragraph => paragraph_attr(name).map(AttributeDescriptor::Paragraph),
        ElementTag::HorizontalRule => rule_attr(name).map(AttributeDescriptor::Rule),
        ElementTag::Xml(_) => None,
    };
    if let Some(desc) = specific {
        return desc;
    }
    match universal_attr(name) {
        Some(u) => AttributeDescriptor::Universal(u),
        None => AttributeDescriptor::Generic,
    }
}

fn paragraph_attr(name: &str) -> Option<ParagraphAttr> {
    if text::names_equal(name, "align") {
        Some(ParagraphAttr::Align)
    } else if text::names_equal(name, "topgap") {
        Some(ParagraphAttr::TopGap)
    } else if text::names_equal(name, "bottomgap") {
        Some(ParagraphAttr::BottomGap)
    } else {
        None
    }
}

fn rule_attr(name: &str) -> Option<RuleAttr> {
    if text::names_equal(name, "align") {
        Some(RuleAttr::Align)
    } else if text::names_equal(name, "noshade") {
        Some(RuleAttr::Noshade)
    } else if text::names_equal(name, "size") {
        Some(RuleAttr::Size)
    } else if text::names_equal(name, "width") {
        Some(RuleAttr::Width)
    } else {
        None
    }
}

fn universal_attr(name: &str) -> Option<UniversalAttr> {
    if text::names_equal(name, "id") {
        Some(UniversalAttr::Id)
    } else if text::names_equal(name, "class") {
        Some(UniversalAttr::Class)
    } else if text::names_equal(name, "style") {
        Some(UniversalAttr::Style)
    } else if text::names_equal(name, "title") {
        Some(UniversalAttr::Title)
    } else if text::names_equal(name, "lang") {
        Some(UniversalAttr::Lang)
    } else if text::names_equal(name, "dir") {
        Some(UniversalAttr::Dir)
    } else {
        None
    }
}

impl AttributeDescriptor {
    /// Validate a proposed value, optionally rewriting it. `Ok(None)`
    /// means the value equals the attribute's implicit default and the
    /// attribute should be absent instead of materialized.
    pub fn verify_and_convert(&self, _parent: NodeId, value: String) -> Result<Option<String>> {
        match self {
            AttributeDescriptor::Generic => Ok(Some(value)),
            AttributeDescriptor::Universal(attr) => match attr {
                UniversalAttr::Id => {
                    if text::is_valid_name(&value) {
                        Ok(Some(value))
                    } else {
                        Err(DomError::invalid_argument(format!(
                            "`{value}` is not a valid id"
                        )))
                    }
                }
                UniversalAttr::Dir => one_of(I18N_DIR, value),
                UniversalAttr::Class
                | UniversalAttr::Style
                | UniversalAttr::Title
                | UniversalAttr::Lang => Ok(Some(value)),
            },
            AttributeDescriptor::Paragraph(attr) => match attr {
                ParagraphAttr::Align => one_of(TEXT_ALIGN, value),
                ParagraphAttr::TopGap | ParagraphAttr::BottomGap => {
                    let lines = verify_range(&value, 0, MAX_GAP)?;
                    // a zero gap is encoded by the absence of markers, not
                    // by a materialized zero
                    Ok(if lines == 0 { None } else { Some(value) })
                }
            },
            AttributeDescriptor::Rule(attr) => match attr {
                RuleAttr::Align => one_of(LCR_ALIGN, value),
                RuleAttr::Noshade => one_of(NOSHADE, value),
                RuleAttr::Size => {
                    verify_range(&value, 0, u32::MAX)?;
                    Ok(Some(value))
                }
                RuleAttr::Width => {
                    Length::from_str(&value)?;
                    Ok(Some(value))
                }
            },
        }
    }

    /// Whether a user may delete this attribute outright.
    pub fn is_removable(&self) -> bool {
        true
    }

    pub fn normalization(&self) -> Normalization {
        match self {
            AttributeDescriptor::Generic => Normalization::Cdata,
            _ => Normalization::NonCdata,
        }
    }

    /// Whether committing this attribute writes a concrete container entry.
    pub fn sync_to_ast(&self) -> bool {
        !self.is_derived()
    }

    /// Derived attributes are views over adjacent structure: reads re-scan
    /// it, writes rewrite it, and nothing is ever stored in the chain.
    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            AttributeDescriptor::Paragraph(ParagraphAttr::TopGap)
                | AttributeDescriptor::Paragraph(ParagraphAttr::BottomGap)
        )
    }

    /// Current value of a derived attribute, `None` when it sits at its
    /// implicit default.
    pub(crate) fn derived_value(&self, dom: &Dom, parent: NodeId) -> Option<String> {
        let lines = match self {
            AttributeDescriptor::Paragraph(ParagraphAttr::TopGap) => {
                paragraph::top_gap_in_ast(dom, parent)
            }
            AttributeDescriptor::Paragraph(ParagraphAttr::BottomGap) => {
                paragraph::bottom_gap_in_ast(dom, parent)
            }
            _ => return None,
        };
        if lines == 0 {
            None
        } else {
            Some(lines.to_string())
        }
    }

    /// Invoked after the attribute is committed, for side effects that
    /// reach beyond the attribute list itself.
    pub(crate) fn custom_action(
        &self,
        dom: &mut Dom,
        parent: NodeId,
        _old: Option<&str>,
        new: Option<&str>,
    ) {
        match self {
            AttributeDescriptor::Paragraph(ParagraphAttr::TopGap) => {
                let lines = new.and_then(|v| v.parse().ok()).unwrap_or(0);
                paragraph::set_top_gap_in_ast(dom, parent, lines);
            }
            AttributeDescriptor::Paragraph(ParagraphAttr::BottomGap) => {
                let lines = new.and_then(|v| v.parse().ok()).unwrap_or(0);
                paragraph::set_bottom_gap_in_ast(dom, parent, lines);
            }
            _ => {}
        }
    }
}

/// Canonicalize `value` to one of `expected`, rejecting anything else.
fn one_of(expected: &'static [&'static str], value: String) -> Result<Option<String>> {
    for candidate in expected {
        if candidate.eq_ignore_ascii_case(&value) {
            return Ok(Some((*candidate).to_string()));
        }
    }
    Err(DomError::must_be_one_of(expected, value))
}

/// Parse a numeric attribute value and check it lies in `min..=max`.
pub(crate) fn verify_range(value: &str, min: u32, max: u32) -> Result<u32> {
    let parsed = value.trim().parse::<u32>().map_err(|_| {
        DomError::invalid_argument(format!("`{value}` is not a non-negative integer"))
    })?;
    if parsed < min || parsed > max {
        return Err(DomError::invalid_argument(format!(
            "`{value}` must lie in {min}..={max}"
        )));
    }
    Ok(parsed)
}
