use std::cell::OnceCell;
use std::fmt;

use crate::domain::EvalDomain;
use crate::operator::{Fixity, Operator};

/// A parse tree node. Evaluated values are cached per node; the first
/// evaluation fills the cache.
pub struct Ast<V> {
    node: Node<V>,
    cache: OnceCell<Option<V>>,
}

pub enum Node<V> {
    /// A real literal or named constant, with its source text.
    Leaf { value: f64, text: String },
    /// A parenthesized subexpression.
    Bracket(Box<Ast<V>>),
    /// An operator applied to its operands. A bare unit has none.
    Apply {
        op: &'static Operator,
        children: Vec<Ast<V>>,
    },
}

impl<V: Clone> Ast<V> {
    fn from_node(node: Node<V>) -> Self {
        Self {
            node,
            cache: OnceCell::new(),
        }
    }

    pub fn leaf(value: f64, text: impl Into<String>) -> Self {
        Self::from_node(Node::Leaf {
            value,
            text: text.into(),
        })
    }

    pub fn bracket(inner: Ast<V>) -> Self {
        Self::from_node(Node::Bracket(Box::new(inner)))
    }

    pub fn apply(op: &'static Operator, children: Vec<Ast<V>>) -> Self {
        Self::from_node(Node::Apply { op, children })
    }

    pub fn node(&self) -> &Node<V> {
        &self.node
    }

    /// Operator at the root, looking through brackets.
    pub fn root_operator(&self) -> Option<&'static Operator> {
        match &self.node {
            Node::Leaf { .. } => None,
            Node::Bracket(inner) => inner.root_operator(),
            Node::Apply { op, .. } => Some(*op),
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Value of the tree in `domain`; `None` when some operation has no
    /// result.
    pub fn evaluate<D: EvalDomain<Value = V>>(&self, domain: &D) -> Option<V> {
        self.cache
            .get_or_init(|| match &self.node {
                Node::Leaf { value, .. } => Some(domain.literal(*value)),
                Node::Bracket(inner) => inner.evaluate(domain),
                Node::Apply { op, children } => {
                    let args = children
                        .iter()
                        .map(|child| child.evaluate(domain))
                        .collect::<Option<Vec<_>>>()?;
                    domain.apply(op.code, &args)
                }
            })
            .clone()
    }

    /// Collapses directly nested brackets: `((x))` becomes `(x)`.
    pub fn normalize(self) -> Self {
        match self.node {
            Node::Leaf { .. } => self,
            Node::Bracket(inner) => {
                let inner = inner.normalize();
                match inner.node {
                    Node::Bracket(_) => inner,
                    _ => Ast::bracket(inner),
                }
            }
            Node::Apply { op, children } => {
                Ast::apply(op, children.into_iter().map(Ast::normalize).collect())
            }
        }
    }
}

impl<V> PartialEq for Ast<V> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<V> PartialEq for Node<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Leaf { value: a, .. }, Node::Leaf { value: b, .. }) => a == b,
            (Node::Bracket(a), Node::Bracket(b)) => a == b,
            (
                Node::Apply { op: a, children: x },
                Node::Apply { op: b, children: y },
            ) => a == b && x == y,
            _ => false,
        }
    }
}

impl<V> fmt::Debug for Ast<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::Leaf { text, .. } => write!(f, "Leaf({text})"),
            Node::Bracket(inner) => f.debug_tuple("Bracket").field(inner).finish(),
            Node::Apply { op, children } => f
                .debug_struct("Apply")
                .field("op", &op.symbol)
                .field("children", children)
                .finish(),
        }
    }
}

/// Prints text that parses back to the same tree.
impl<V> fmt::Display for Ast<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::Leaf { text, .. } => f.write_str(text),
            Node::Bracket(inner) => write!(f, "({inner})"),
            Node::Apply { op, children } => match (op.fixity, children.as_slice()) {
                (Fixity::Infix, [lhs, rhs]) => write!(f, "{lhs} {} {rhs}", op.symbol),
                (Fixity::Prefix, [operand]) => {
                    let gap = if op.is_word() && !matches!(operand.node, Node::Bracket(_)) {
                        " "
                    } else {
                        ""
                    };
                    write!(f, "{}{gap}{operand}", op.symbol)
                }
                (Fixity::Suffix, [operand]) => write!(f, "{operand}{}", op.symbol),
                (_, []) => f.write_str(op.symbol),
                _ => Err(fmt::Error),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UltraDomain;
    use crate::operator::{lookup, ULTRA_OPERATORS};
    use hypercalc_core::Ultra;

    fn op(symbol: &'static str) -> &'static Operator {
        lookup(&ULTRA_OPERATORS, symbol).next().unwrap()
    }

    #[test]
    fn test_evaluate_caches_values() {
        let tree: Ast<Ultra> = Ast::apply(op("+"), vec![Ast::leaf(1.0, "1"), Ast::leaf(2.0, "2")]);
        assert!(!tree.is_cached());
        assert_eq!(tree.evaluate(&UltraDomain).unwrap(), Ultra::real(3.0));
        assert!(tree.is_cached());
    }

    #[test]
    fn test_normalize_collapses_double_brackets() {
        let tree: Ast<Ultra> = Ast::bracket(Ast::bracket(Ast::bracket(Ast::leaf(1.0, "1"))));
        let normal = tree.normalize();
        assert_eq!(normal.to_string(), "(1)");
        assert_eq!(normal, Ast::bracket(Ast::leaf(1.0, "1")));
    }

    #[test]
    fn test_display() {
        let sin = lookup(&ULTRA_OPERATORS, "sin").next().unwrap();
        let tree: Ast<Ultra> = Ast::apply(
            op("*"),
            vec![
                Ast::apply(sin, vec![Ast::leaf(2.0, "2")]),
                Ast::apply(op("ⅈ"), Vec::new()),
            ],
        );
        assert_eq!(tree.to_string(), "sin 2 * ⅈ");
        assert_eq!(tree.root_operator().map(|op| op.symbol), Some("*"));
    }
}
