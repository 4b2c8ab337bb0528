//! Operator and AST types.
//!
//! Every operator has a fixed arity; the parser consumes exactly that many
//! child expressions with no delimiters. `-1` means variadic up to a closing
//! token (only `[`). AST types derive serde so a parsed program can be
//! dumped and reloaded with postcard.

use std::fmt::Write;

use crate::number::Num;

/// Every expression operator, named after what it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub(crate) enum Op {
    /// `!` logical negation to 0/1
    Not,
    /// `&` short-circuit and, returns an operand
    And,
    /// `|` short-circuit or, returns an operand
    Or,
    /// `?` ternary; only the taken branch is evaluated
    Ternary,
    /// `[` variadic list constructor
    ListOf,
    /// `]` one-element list
    OneList,
    /// `,` empty/one/two-element list
    Pair,
    /// `_` negate / reverse
    Neg,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Times,
    /// `^`
    Power,
    /// `<` compare / slice
    LessThan,
    /// `>` compare / slice
    GreaterThan,
    /// `` ` `` repr
    Repr,
    /// `{` dedupe
    Unique,
    /// `}` membership / substring
    In,
    /// `f` filter or first-integer search
    Filter,
    /// `h` first / +1
    Head,
    /// `l` length / log2
    Len,
    /// `m` map
    Map,
    /// `n` inequality to 0/1
    NotEquals,
    /// `o` order by key
    OrderBy,
    /// `p` print without newline, passes its argument through
    Print,
    /// `q` equality to 0/1
    Equals,
    /// `s` floor / parse number / fold with `+`
    Sum,
    /// `t` drop first / -1
    Tail,
    /// `H` last element
    End,
    /// `L` call the lambda (its first occurrence parses as `init-L` instead)
    Lambda,
    /// `S` sort / one-based range
    Sorted,
    /// `T` drop last / mod 10
    Pop,
    /// `U` range / indices
    UnaryRange,
    /// `.!` factorial / gamma
    Factorial,
    /// `.<` left shift / rotate left
    LeftShift,
    /// `.>` right shift / rotate right
    RightShift,
}

impl Op {
    pub fn from_symb(symb: &str) -> Option<Self> {
        Some(match symb {
            "!" => Self::Not,
            "&" => Self::And,
            "|" => Self::Or,
            "?" => Self::Ternary,
            "[" => Self::ListOf,
            "]" => Self::OneList,
            "," => Self::Pair,
            "_" => Self::Neg,
            "+" => Self::Plus,
            "-" => Self::Minus,
            "*" => Self::Times,
            "^" => Self::Power,
            "<" => Self::LessThan,
            ">" => Self::GreaterThan,
            "`" => Self::Repr,
            "{" => Self::Unique,
            "}" => Self::In,
            "f" => Self::Filter,
            "h" => Self::Head,
            "l" => Self::Len,
            "m" => Self::Map,
            "n" => Self::NotEquals,
            "o" => Self::OrderBy,
            "p" => Self::Print,
            "q" => Self::Equals,
            "s" => Self::Sum,
            "t" => Self::Tail,
            "H" => Self::End,
            "L" => Self::Lambda,
            "S" => Self::Sorted,
            "T" => Self::Pop,
            "U" => Self::UnaryRange,
            ".!" => Self::Factorial,
            ".<" => Self::LeftShift,
            ".>" => Self::RightShift,
            _ => return None,
        })
    }

    /// Declared argument count; `-1` is variadic up to a closing token.
    pub fn arity(self) -> i32 {
        match self {
            Self::ListOf => -1,
            Self::Not
            | Self::OneList
            | Self::Neg
            | Self::Repr
            | Self::Unique
            | Self::Head
            | Self::Len
            | Self::Print
            | Self::Sum
            | Self::Tail
            | Self::End
            | Self::Lambda
            | Self::Sorted
            | Self::Pop
            | Self::UnaryRange
            | Self::Factorial => 1,
            Self::Ternary => 3,
            _ => 2,
        }
    }

    /// The runtime name used in error messages and the program dump,
    /// mirroring the reference implementation's function names.
    pub fn name(self) -> &'static str {
        match self {
            Self::Not => "Pnot",
            Self::And => "and",
            Self::Or => "or",
            Self::Ternary => "ternary",
            Self::ListOf => "list",
            Self::OneList => "one_list",
            Self::Pair => "pair",
            Self::Neg => "neg",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Times => "times",
            Self::Power => "power",
            Self::LessThan => "less_than",
            Self::GreaterThan => "greater_than",
            Self::Repr => "Prepr",
            Self::Unique => "unique",
            Self::In => "Pin",
            Self::Filter => "Pfilter",
            Self::Head => "head",
            Self::Len => "Plen",
            Self::Map => "Pmap",
            Self::NotEquals => "not_equals",
            Self::OrderBy => "order_by",
            Self::Print => "Pprint",
            Self::Equals => "equals",
            Self::Sum => "Psum",
            Self::Tail => "tail",
            Self::End => "end",
            Self::Lambda => "L",
            Self::Sorted => "Psorted",
            Self::Pop => "pop",
            Self::UnaryRange => "unary_range",
            Self::Factorial => "factorial",
            Self::LeftShift => "leftshift",
            Self::RightShift => "rightshift",
        }
    }
}

/// The head of an expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub(crate) enum Head {
    Op(Op),
    /// `=`: assign, evaluates to the new value.
    Assign,
    /// `~`: assign, evaluates to the previous value.
    PostAssign,
    /// First occurrence of `x`: args are `[init]`.
    InitX,
    /// First occurrence of `y`: args are `[init]`.
    InitY,
    /// First occurrence of `L`: args are `[body]` or `[body, invocation]`.
    InitL,
}

/// A literal AST leaf.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) enum Literal {
    Num(Num),
    Str(String),
    /// Binary string: evaluates to the list of byte values.
    Bytes(Vec<u8>),
    Var(String),
}

/// An AST node: a literal, an operator application, or a block.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) enum Node {
    Lit(Literal),
    Expr { head: Head, args: Vec<Node> },
    Block(Block),
}

/// One item of a block body with its auto-print decision.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) struct Item {
    pub node: Node,
    pub print: bool,
}

/// A control-flow grouping. Blocks own their children; the AST is a tree.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) struct Block {
    pub kind: BlockKind,
    pub children: Vec<Item>,
    /// The attached `E` branch: the false branch of an `I`, or the
    /// ran-to-completion branch of a loop.
    pub else_block: Option<Box<Block>>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub(crate) enum BlockKind {
    Root,
    /// `F`: for-each. Without an explicit variable one is drawn from the
    /// lambda-variable cycle at evaluation time.
    For { var: Option<String>, iter: Box<Node> },
    /// `I`
    If { cond: Box<Node> },
    /// `#`: loop forever; a break or any runtime error ends it normally.
    Forever,
    /// `B`
    Break,
    /// `E` while floating: only ever stored inside `else_block`.
    Else,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            else_block: None,
        }
    }

    /// Renders the program the way the evaluator sees it, for the CLI's
    /// debug dump: nested function-call pseudocode with indented blocks.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, level: usize) {
        let indent = "    ".repeat(level);
        let header = match &self.kind {
            BlockKind::Root => None,
            BlockKind::For { var, iter } => {
                let var = var.as_deref().unwrap_or("<cycle>");
                Some(format!("for {var} in makeiter({}):", dump_expr(iter)))
            }
            BlockKind::If { cond } => Some(format!("if {}:", dump_expr(cond))),
            BlockKind::Forever => Some("loop:".to_owned()),
            BlockKind::Break => Some("break".to_owned()),
            BlockKind::Else => Some("else:".to_owned()),
        };
        let body_level = if let Some(header) = header {
            let _ = writeln!(out, "{indent}{header}");
            level + 1
        } else {
            level
        };

        let body_indent = "    ".repeat(body_level);
        for item in &self.children {
            match &item.node {
                Node::Block(block) => block.dump_into(out, body_level),
                expr => {
                    let code = dump_expr(expr);
                    if item.print {
                        let _ = writeln!(out, "{body_indent}autoprint({code})");
                    } else {
                        let _ = writeln!(out, "{body_indent}{code}");
                    }
                }
            }
        }
        if let Some(else_block) = &self.else_block {
            else_block.dump_into(out, level);
        }
    }
}

fn dump_expr(node: &Node) -> String {
    match node {
        Node::Lit(Literal::Num(n)) => n.to_string(),
        Node::Lit(Literal::Str(s)) => format!("{s:?}"),
        Node::Lit(Literal::Bytes(b)) => format!("{b:?}"),
        Node::Lit(Literal::Var(name)) => name.clone(),
        Node::Expr { head, args } => {
            let rendered: Vec<String> = args.iter().map(dump_expr).collect();
            let name = match head {
                Head::Op(op) => op.name(),
                Head::Assign => "assign",
                Head::PostAssign => "post_assign",
                Head::InitX => "init_x",
                Head::InitY => "init_y",
                Head::InitL => "init_L",
            };
            format!("{name}({})", rendered.join(", "))
        }
        Node::Block(_) => "<block>".to_owned(),
    }
}
