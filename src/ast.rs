/// Bracket kind of a notation group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    /// `< ... >` - a literal keyword
    Literal,
    /// `[ ... ]` - an optional span, possibly with `|` members
    Optional,
    /// `{ ... | ... }` - an alternation
    Union,
}

/// Node of the parsed rule notation, before any typing
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    /// Plain text run (positional name, literal keyword or `|` separator)
    Text(&'a str),
    /// Bracketed group
    Group(Group<'a>),
}

impl Node<'_> {
    pub fn is_separator(&self) -> bool {
        matches!(self, Node::Text("|"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    pub bracket: Bracket,
    pub lexeme: &'a str,
    pub children: Vec<Node<'a>>,
}
