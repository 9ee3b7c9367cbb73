//! CSS selector subset
//!
//! Parses the selectors a widget uses to find its parts and matches them
//! against any tree exposing parents and per-node compound tests.
//!
//! # Error Handling
//!
//! The parser uses nom's context-based error capture. Failures are reported
//! as a `SelectorError` with the column and the input fragment where parsing
//! stopped, and are logged via tracing at DEBUG level.
//!
//! # Supported Syntax
//!
//! - Type selectors: `li`, `*`
//! - ID selectors: `#slides`
//! - Class selectors: `.carousel-item`
//! - Attribute selectors: `[data-gotoslide]`, `[data-gotoslide=prev]`, `[data-gotoslide="3"]`
//! - Combinators: descendant (whitespace) and child (`>`)
//! - Selector lists: `[data-gotoslide="prev"], [data-gotoslide="next"]`
//!
//! # Example
//!
//! ```
//! use carousel_dom::selector::Selector;
//!
//! let selector = Selector::parse(".carousel-pagination > li [data-gotoslide]").unwrap();
//! assert_eq!(selector.alternatives().len(), 1);
//!
//! let err = Selector::parse(".carousel-list >").unwrap_err();
//! assert_eq!(err.column, 16);
//! ```

use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{cut, opt, value},
    error::{context, ErrorKind, ParseError as NomParseError, VerboseError, VerboseErrorKind},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, tuple},
    Finish, IResult,
};
use tracing::debug;

use carousel_core::CarouselError;

/// Custom parser result type using VerboseError for better diagnostics
type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Error produced when a selector cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    /// Human-readable message with context
    pub message: String,
    /// Column number (1-indexed) where parsing stopped
    pub column: usize,
    /// The input fragment at the failure position
    pub fragment: String,
    /// Context stack from nom's VerboseError
    pub contexts: Vec<String>,
}

impl std::fmt::Display for SelectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "column {}: {}", self.column, self.message)?;
        if !self.contexts.is_empty() {
            write!(f, " (in {})", self.contexts.join(" > "))?;
        }
        if !self.fragment.is_empty() {
            write!(f, " near \"{}\"", self.fragment)?;
        }
        Ok(())
    }
}

impl std::error::Error for SelectorError {}

impl SelectorError {
    fn from_verbose(input: &str, err: VerboseError<&str>) -> Self {
        let (column, fragment) = match err.errors.first() {
            Some((frag, _)) => calculate_position(input, frag),
            None => (1, String::new()),
        };

        let contexts = err
            .errors
            .iter()
            .filter_map(|(_, kind)| match kind {
                VerboseErrorKind::Context(ctx) => Some((*ctx).to_string()),
                _ => None,
            })
            .collect();

        Self {
            message: format_verbose_error(&err),
            column,
            fragment,
            contexts,
        }
    }

    fn trailing(input: &str, remaining: &str) -> Self {
        let (column, fragment) = calculate_position(input, remaining.trim_start());
        Self {
            message: "unexpected trailing input".to_string(),
            column,
            fragment,
            contexts: Vec::new(),
        }
    }

    /// Convert into the shared carousel error for `selector`
    pub fn into_carousel_error(self, selector: &str) -> CarouselError {
        CarouselError::InvalidSelector {
            selector: selector.to_string(),
            message: self.to_string(),
        }
    }
}

/// Format a VerboseError into a human-readable message
fn format_verbose_error(err: &VerboseError<&str>) -> String {
    let parts: Vec<String> = err
        .errors
        .iter()
        .filter_map(|(input, kind)| match kind {
            VerboseErrorKind::Char(c) => {
                let preview: String = input.chars().take(20).collect();
                Some(format!("expected '{}' near \"{}\"", c, preview))
            }
            VerboseErrorKind::Nom(ek) => Some(format!("{:?}", ek)),
            VerboseErrorKind::Context(_) => None,
        })
        .collect();

    if parts.is_empty() {
        "unknown parse error".to_string()
    } else {
        parts.join(", ")
    }
}

/// Column (1-indexed) of `fragment` inside `original`, plus a short preview
fn calculate_position(original: &str, fragment: &str) -> (usize, String) {
    let offset = original.len().saturating_sub(fragment.len());
    let column = original[..offset].chars().count() + 1;
    let preview: String = fragment.chars().take(30).collect();
    (column, preview)
}

// ============================================================================
// Selector AST
// ============================================================================

/// How an attribute selector compares the attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatch {
    /// `[name]`
    Exists,
    /// `[name=value]`
    Equals(String),
}

/// A single `[...]` attribute test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSelector {
    pub name: String,
    pub matcher: AttrMatch,
}

impl AttrSelector {
    /// Check an attribute value (None when the attribute is absent)
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (&self.matcher, value) {
            (_, None) => false,
            (AttrMatch::Exists, Some(_)) => true,
            (AttrMatch::Equals(expected), Some(actual)) => expected == actual,
        }
    }
}

/// A sequence of simple selectors applying to one element (`li.page[data-x]`)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    /// Type selector; None for `*` or when omitted
    pub element: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttrSelector>,
}

/// Relationship between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: any ancestor
    Descendant,
    /// `>`: the direct parent
    Child,
}

/// Compound selectors joined by combinators (`.nav > li a`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// Left to right
    compounds: Vec<CompoundSelector>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

/// Tree access needed to evaluate selectors
pub trait MatchTree {
    type Node: Copy;

    /// Parent of `node`, None at the root or for detached nodes
    fn parent_of(&self, node: Self::Node) -> Option<Self::Node>;

    /// Check `node` against a single compound selector
    fn matches_compound(&self, node: Self::Node, compound: &CompoundSelector) -> bool;
}

impl ComplexSelector {
    /// The compound selectors, left to right
    pub fn compounds(&self) -> &[CompoundSelector] {
        &self.compounds
    }

    /// Check whether `node` matches, evaluating right to left
    pub fn matches<T: MatchTree>(&self, tree: &T, node: T::Node) -> bool {
        match self.compounds.len() {
            0 => false,
            len => self.match_at(tree, len - 1, node),
        }
    }

    fn match_at<T: MatchTree>(&self, tree: &T, index: usize, node: T::Node) -> bool {
        if !tree.matches_compound(node, &self.compounds[index]) {
            return false;
        }
        if index == 0 {
            return true;
        }

        match self.combinators[index - 1] {
            Combinator::Child => tree
                .parent_of(node)
                .is_some_and(|parent| self.match_at(tree, index - 1, parent)),
            Combinator::Descendant => {
                let mut ancestor = tree.parent_of(node);
                while let Some(candidate) = ancestor {
                    if self.match_at(tree, index - 1, candidate) {
                        return true;
                    }
                    ancestor = tree.parent_of(candidate);
                }
                false
            }
        }
    }
}

/// A parsed selector list; matches when any alternative matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<ComplexSelector>,
}

impl Selector {
    /// Parse selector text
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        match selector_list(input).finish() {
            Ok((remaining, alternatives)) if remaining.trim().is_empty() => {
                Ok(Self { alternatives })
            }
            Ok((remaining, _)) => {
                let err = SelectorError::trailing(input, remaining);
                debug!(selector = input, column = err.column, "selector has trailing input");
                Err(err)
            }
            Err(err) => {
                let err = SelectorError::from_verbose(input, err);
                debug!(selector = input, column = err.column, message = %err.message, "selector parse error");
                Err(err)
            }
        }
    }

    /// The comma-separated alternatives
    pub fn alternatives(&self) -> &[ComplexSelector] {
        &self.alternatives
    }

    /// Check whether `node` matches any alternative
    pub fn matches<T: MatchTree>(&self, tree: &T, node: T::Node) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(tree, node))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Nom Parsers
// ============================================================================

/// Parse an identifier (alphanumeric, hyphen, underscore)
fn identifier<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

enum SimplePart {
    Id(String),
    Class(String),
    Attr(AttrSelector),
}

fn id_part(input: &str) -> ParseResult<SimplePart> {
    context("ID selector", |input| {
        let (input, _) = char('#')(input)?;
        let (input, id) = cut(identifier)(input)?;
        Ok((input, SimplePart::Id(id.to_string())))
    })(input)
}

fn class_part(input: &str) -> ParseResult<SimplePart> {
    context("class selector", |input| {
        let (input, _) = char('.')(input)?;
        let (input, class) = cut(identifier)(input)?;
        Ok((input, SimplePart::Class(class.to_string())))
    })(input)
}

/// Parse an attribute value: bare identifier or single/double quoted string
fn attr_value(input: &str) -> ParseResult<&str> {
    context(
        "attribute value",
        alt((
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            identifier,
        )),
    )(input)
}

fn attr_part(input: &str) -> ParseResult<SimplePart> {
    context("attribute selector", |input| {
        let (input, _) = char('[')(input)?;
        let (input, (_, name, _, expected, _)) = cut(tuple((
            multispace0,
            identifier,
            multispace0,
            opt(preceded(pair(char('='), multispace0), attr_value)),
            multispace0,
        )))(input)?;
        let (input, _) = cut(char(']'))(input)?;

        let matcher = match expected {
            Some(v) => AttrMatch::Equals(v.to_string()),
            None => AttrMatch::Exists,
        };
        Ok((
            input,
            SimplePart::Attr(AttrSelector {
                name: name.to_string(),
                matcher,
            }),
        ))
    })(input)
}

fn compound(input: &str) -> ParseResult<CompoundSelector> {
    context("compound selector", |input| {
        let (input, element) = opt(alt((identifier, tag("*"))))(input)?;
        let (input, parts) = many0(alt((id_part, class_part, attr_part)))(input)?;

        if element.is_none() && parts.is_empty() {
            return Err(nom::Err::Error(VerboseError::from_error_kind(
                input,
                ErrorKind::Verify,
            )));
        }

        let mut compound = CompoundSelector {
            element: element.filter(|e| *e != "*").map(str::to_string),
            ..Default::default()
        };
        for part in parts {
            match part {
                SimplePart::Id(id) => compound.id = Some(id),
                SimplePart::Class(class) => compound.classes.push(class),
                SimplePart::Attr(attr) => compound.attributes.push(attr),
            }
        }
        Ok((input, compound))
    })(input)
}

fn combinator(input: &str) -> ParseResult<Combinator> {
    alt((
        value(
            Combinator::Child,
            delimited(multispace0, char('>'), multispace0),
        ),
        value(Combinator::Descendant, multispace1),
    ))(input)
}

fn complex(input: &str) -> ParseResult<ComplexSelector> {
    let (input, head) = compound(input)?;
    let (input, rest) = many0(pair(combinator, compound))(input)?;

    let mut compounds = Vec::with_capacity(rest.len() + 1);
    let mut combinators = Vec::with_capacity(rest.len());
    compounds.push(head);
    for (comb, part) in rest {
        combinators.push(comb);
        compounds.push(part);
    }
    Ok((input, ComplexSelector { compounds, combinators }))
}

fn selector_list(input: &str) -> ParseResult<Vec<ComplexSelector>> {
    let (input, _) = multispace0(input)?;
    separated_list1(delimited(multispace0, char(','), multispace0), complex)(input)
}
