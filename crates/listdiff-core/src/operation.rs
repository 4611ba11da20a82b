//! Operation registry.
//!
//! Each [`Operation`] row names one behaviour of the list contract, declares
//! the kinds of its parameters and the shape of its result, and carries a
//! thunk that performs the call on any [`ListContract`]. The harness walks
//! the table in declared order; covering a new behaviour means adding a row.

use std::fmt;

use serde::Serialize;

use crate::fault::ListFault;
use crate::list::{Comparator, Element, ListContract, Transform};

/// Declared semantic kind of an operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParamKind {
    /// Position in `[0, size)`.
    Index,
    /// Element value.
    Element,
    /// Value compared against elements (search and removal by value).
    Object,
    /// Bulk collection of elements.
    Collection,
    /// Element ordering.
    Comparator,
    /// Element transform.
    UnaryOperator,
    /// Destination array of optional elements.
    ObjectArray,
    /// A kind the synthesizer cannot generate.
    Unsupported(&'static str),
}

impl ParamKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Element => "element",
            Self::Object => "object",
            Self::Collection => "collection",
            Self::Comparator => "comparator",
            Self::UnaryOperator => "unary_operator",
            Self::ObjectArray => "object_array",
            Self::Unsupported(name) => name,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the oracle compares an operation's results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReturnShape {
    /// Scalar or object; absence must match, then equality.
    Value,
    /// Element-wise array equality.
    Array,
    /// Lazily consumed pairwise; lengths must match.
    Sequence,
    /// Invoked for side effects and absence of failure only.
    Opaque,
    /// No result.
    Void,
}

/// A synthesized argument.
#[derive(Debug, Clone)]
pub enum Arg {
    Index(usize),
    Element(Element),
    Collection(Vec<Element>),
    Comparator(Comparator),
    Transform(Transform),
    Array(Vec<Option<Element>>),
}

/// Comparable result of a `Value`-shaped operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Size(usize),
    Element(Element),
    /// Search result; `None` when the element is absent.
    Position(Option<usize>),
    Elements(Vec<Element>),
}

impl Value {
    /// Whether this is the "no result" value of its kind.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Position(None))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) | Self::Element(v) => write!(f, "{v}"),
            Self::Size(v) | Self::Position(Some(v)) => write!(f, "{v}"),
            Self::Position(None) => f.write_str("none"),
            Self::Elements(items) if items.len() <= 16 => write!(f, "{items:?}"),
            Self::Elements(items) => write!(f, "[{} elements]", items.len()),
        }
    }
}

/// Raw result of invoking an operation on one container.
pub enum Outcome<'a> {
    Value(Value),
    Array(Vec<Option<Element>>),
    Sequence(Box<dyn Iterator<Item = Element> + 'a>),
    Opaque,
    Void,
}

impl Outcome<'_> {
    #[must_use]
    pub const fn shape(&self) -> ReturnShape {
        match self {
            Self::Value(_) => ReturnShape::Value,
            Self::Array(_) => ReturnShape::Array,
            Self::Sequence(_) => ReturnShape::Sequence,
            Self::Opaque => ReturnShape::Opaque,
            Self::Void => ReturnShape::Void,
        }
    }
}

impl fmt::Debug for Outcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Array(a) => f.debug_tuple("Array").field(&a.len()).finish(),
            Self::Sequence(_) => f.write_str("Sequence(..)"),
            Self::Opaque => f.write_str("Opaque"),
            Self::Void => f.write_str("Void"),
        }
    }
}

/// Invocation thunk: performs one operation on a container.
pub type Thunk = for<'a> fn(&'a mut dyn ListContract, &[Arg]) -> Result<Outcome<'a>, ListFault>;

/// One row of the registry.
#[derive(Clone, Copy)]
pub struct Operation {
    pub name: &'static str,
    pub params: &'static [ParamKind],
    pub shape: ReturnShape,
    pub thunk: Thunk,
}

impl Operation {
    #[must_use]
    pub const fn id(&self) -> OperationId {
        OperationId {
            name: self.name,
            params: self.params,
        }
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// Identity of an operation: name plus declared parameter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OperationId {
    pub name: &'static str,
    pub params: &'static [ParamKind],
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}

// ── Argument accessors ────────────────────────────────────────────────────────

fn mismatch(position: usize, expected: &str) -> ListFault {
    ListFault::IllegalState(format!("argument {position} is not {expected}"))
}

fn index_arg(args: &[Arg], position: usize) -> Result<usize, ListFault> {
    match args.get(position) {
        Some(Arg::Index(index)) => Ok(*index),
        _ => Err(mismatch(position, "an index")),
    }
}

fn element_arg(args: &[Arg], position: usize) -> Result<Element, ListFault> {
    match args.get(position) {
        Some(Arg::Element(value)) => Ok(*value),
        _ => Err(mismatch(position, "an element")),
    }
}

fn collection_arg(args: &[Arg], position: usize) -> Result<&[Element], ListFault> {
    match args.get(position) {
        Some(Arg::Collection(items)) => Ok(items),
        _ => Err(mismatch(position, "a collection")),
    }
}

// ── Thunks ────────────────────────────────────────────────────────────────────

fn op_size<'a>(list: &'a mut dyn ListContract, _: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    Ok(Outcome::Value(Value::Size(list.size())))
}

fn op_is_empty<'a>(list: &'a mut dyn ListContract, _: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    Ok(Outcome::Value(Value::Bool(list.is_empty())))
}

fn op_contains<'a>(list: &'a mut dyn ListContract, args: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    let value = element_arg(args, 0)?;
    Ok(Outcome::Value(Value::Bool(list.contains(value))))
}

fn op_iter<'a>(list: &'a mut dyn ListContract, _: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    Ok(Outcome::Sequence(list.iter()))
}

fn op_to_array<'a>(list: &'a mut dyn ListContract, _: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    Ok(Outcome::Array(list.to_array().into_iter().map(Some).collect()))
}

fn op_to_array_into<'a>(
    list: &'a mut dyn ListContract,
    args: &[Arg],
) -> Result<Outcome<'a>, ListFault> {
    let dest = match args.first() {
        Some(Arg::Array(dest)) => dest.clone(),
        _ => return Err(mismatch(0, "an array")),
    };
    Ok(Outcome::Array(list.to_array_into(dest)))
}

fn op_add<'a>(list: &'a mut dyn ListContract, args: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    let value = element_arg(args, 0)?;
    Ok(Outcome::Value(Value::Bool(list.add(value))))
}

fn op_remove_element<'a>(
    list: &'a mut dyn ListContract,
    args: &[Arg],
) -> Result<Outcome<'a>, ListFault> {
    let value = element_arg(args, 0)?;
    Ok(Outcome::Value(Value::Bool(list.remove_element(value))))
}

fn op_contains_all<'a>(
    list: &'a mut dyn ListContract,
    args: &[Arg],
) -> Result<Outcome<'a>, ListFault> {
    let other = collection_arg(args, 0)?;
    Ok(Outcome::Value(Value::Bool(list.contains_all(other))))
}

fn op_add_all<'a>(list: &'a mut dyn ListContract, args: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    let other = collection_arg(args, 0)?;
    Ok(Outcome::Value(Value::Bool(list.add_all(other))))
}

fn op_add_all_at<'a>(
    list: &'a mut dyn ListContract,
    args: &[Arg],
) -> Result<Outcome<'a>, ListFault> {
    let index = index_arg(args, 0)?;
    let other = collection_arg(args, 1)?;
    Ok(Outcome::Value(Value::Bool(list.add_all_at(index, other)?)))
}

fn op_remove_all<'a>(
    list: &'a mut dyn ListContract,
    args: &[Arg],
) -> Result<Outcome<'a>, ListFault> {
    let other = collection_arg(args, 0)?;
    Ok(Outcome::Value(Value::Bool(list.remove_all(other))))
}

fn op_retain_all<'a>(
    list: &'a mut dyn ListContract,
    args: &[Arg],
) -> Result<Outcome<'a>, ListFault> {
    let other = collection_arg(args, 0)?;
    Ok(Outcome::Value(Value::Bool(list.retain_all(other))))
}

fn op_replace_all<'a>(
    list: &'a mut dyn ListContract,
    args: &[Arg],
) -> Result<Outcome<'a>, ListFault> {
    let Some(Arg::Transform(op)) = args.first() else {
        return Err(mismatch(0, "a transform"));
    };
    list.replace_all(*op)?;
    Ok(Outcome::Void)
}

fn op_sort<'a>(list: &'a mut dyn ListContract, args: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    let Some(Arg::Comparator(cmp)) = args.first() else {
        return Err(mismatch(0, "a comparator"));
    };
    list.sort(*cmp)?;
    Ok(Outcome::Void)
}

fn op_equals<'a>(list: &'a mut dyn ListContract, args: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    let other = collection_arg(args, 0)?;
    Ok(Outcome::Value(Value::Bool(list.equals(other))))
}

fn op_hash_code<'a>(list: &'a mut dyn ListContract, _: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    Ok(Outcome::Value(Value::Int(list.hash_code())))
}

fn op_get<'a>(list: &'a mut dyn ListContract, args: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    let index = index_arg(args, 0)?;
    Ok(Outcome::Value(Value::Element(list.get(index)?)))
}

fn op_set<'a>(list: &'a mut dyn ListContract, args: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    let index = index_arg(args, 0)?;
    let value = element_arg(args, 1)?;
    Ok(Outcome::Value(Value::Element(list.set(index, value)?)))
}

fn op_insert<'a>(list: &'a mut dyn ListContract, args: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    let index = index_arg(args, 0)?;
    let value = element_arg(args, 1)?;
    list.insert(index, value)?;
    Ok(Outcome::Void)
}

fn op_remove_at<'a>(
    list: &'a mut dyn ListContract,
    args: &[Arg],
) -> Result<Outcome<'a>, ListFault> {
    let index = index_arg(args, 0)?;
    Ok(Outcome::Value(Value::Element(list.remove_at(index)?)))
}

fn op_index_of<'a>(list: &'a mut dyn ListContract, args: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    let value = element_arg(args, 0)?;
    Ok(Outcome::Value(Value::Position(list.index_of(value))))
}

fn op_last_index_of<'a>(
    list: &'a mut dyn ListContract,
    args: &[Arg],
) -> Result<Outcome<'a>, ListFault> {
    let value = element_arg(args, 0)?;
    Ok(Outcome::Value(Value::Position(list.last_index_of(value))))
}

fn op_list_iter<'a>(list: &'a mut dyn ListContract, _: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    Ok(Outcome::Sequence(list.list_iter()))
}

fn op_list_iter_from<'a>(
    list: &'a mut dyn ListContract,
    args: &[Arg],
) -> Result<Outcome<'a>, ListFault> {
    let index = index_arg(args, 0)?;
    Ok(Outcome::Sequence(list.list_iter_from(index)?))
}

fn op_sub_list<'a>(list: &'a mut dyn ListContract, args: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    let from = index_arg(args, 0)?;
    let to = index_arg(args, 1)?;
    Ok(Outcome::Value(Value::Elements(list.sub_list(from, to)?)))
}

fn op_cursor<'a>(list: &'a mut dyn ListContract, _: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    let mut cursor = list.cursor();
    let _ = cursor.estimate_size();
    while cursor.try_advance().is_some() {}
    Ok(Outcome::Opaque)
}

fn op_clear<'a>(list: &'a mut dyn ListContract, _: &[Arg]) -> Result<Outcome<'a>, ListFault> {
    list.clear();
    Ok(Outcome::Void)
}

// ── Registry ──────────────────────────────────────────────────────────────────

macro_rules! op {
    ($name:literal, [$($param:ident),*], $shape:ident, $thunk:ident) => {
        Operation {
            name: $name,
            params: &[$(ParamKind::$param),*],
            shape: ReturnShape::$shape,
            thunk: $thunk,
        }
    };
}

/// Every operation of the list contract, in the order a run visits them.
///
/// `clear` comes last so the other operations see populated containers.
pub static LIST_OPERATIONS: &[Operation] = &[
    op!("size", [], Value, op_size),
    op!("is_empty", [], Value, op_is_empty),
    op!("contains", [Object], Value, op_contains),
    op!("iter", [], Sequence, op_iter),
    op!("to_array", [], Array, op_to_array),
    op!("to_array_into", [ObjectArray], Array, op_to_array_into),
    op!("add", [Element], Value, op_add),
    op!("remove_element", [Object], Value, op_remove_element),
    op!("contains_all", [Collection], Value, op_contains_all),
    op!("add_all", [Collection], Value, op_add_all),
    op!("add_all_at", [Index, Collection], Value, op_add_all_at),
    op!("remove_all", [Collection], Value, op_remove_all),
    op!("retain_all", [Collection], Value, op_retain_all),
    op!("replace_all", [UnaryOperator], Void, op_replace_all),
    op!("sort", [Comparator], Void, op_sort),
    op!("equals", [Collection], Value, op_equals),
    op!("hash_code", [], Value, op_hash_code),
    op!("get", [Index], Value, op_get),
    op!("set", [Index, Element], Value, op_set),
    op!("insert", [Index, Element], Void, op_insert),
    op!("remove_at", [Index], Value, op_remove_at),
    op!("index_of", [Object], Value, op_index_of),
    op!("last_index_of", [Object], Value, op_last_index_of),
    op!("list_iter", [], Sequence, op_list_iter),
    op!("list_iter_from", [Index], Sequence, op_list_iter_from),
    op!("sub_list", [Index, Index], Value, op_sub_list),
    op!("cursor", [], Opaque, op_cursor),
    op!("clear", [], Void, op_clear),
];

/// Look up a registry row by name.
#[must_use]
pub fn find_operation(name: &str) -> Option<&'static Operation> {
    LIST_OPERATIONS.iter().find(|op| op.name == name)
}
