//! The arity-driven parser.
//!
//! There are no delimiters: each operator consumes exactly its declared
//! number of argument expressions. `)` closes one open level (consumed,
//! unbalanced is fine), `;` unwinds everything back to the root (it is only
//! consumed there), and a space is a pure separator that also suppresses the
//! auto-print of the following block item.
//!
//! Two parse-time rewrites keep the evaluator simple:
//! - `=`/`~` with a function head (`=+z5`) peek the variable so it serves as
//!   both the first argument and the assignment target.
//! - the first occurrence of `x`, `y` or `L` becomes an `init-*` expression
//!   carrying its initializer; later occurrences are plain references.

use crate::{
    exception::{Error, parser_error},
    expressions::{Block, BlockKind, Head, Item, Literal, Node, Op},
    lexer::{Lexer, Token},
    number::Num,
};

/// Names with arity 0. `x` and `y` are init-on-first-use; the rest are
/// preset in the environment.
pub(crate) const VARIABLES: &[&str] = &[
    "a", "b", "c", "d", "e", "k", "w", "x", "y", "z", "Z", "$a", "$q", "$A", "$Q",
];

/// Block tokens are not valid expression heads.
const BLOCK_TOKS: &[&str] = &["#", "B", "E", "F", "I"];

pub(crate) fn is_variable(name: &str) -> bool {
    VARIABLES.contains(&name)
}

/// Tracks which init-on-first-use tokens have been rewritten already.
#[derive(Debug, Default)]
struct SeenInit {
    x: bool,
    y: bool,
    lambda: bool,
}

#[derive(Debug)]
pub(crate) struct Parser {
    lex: Lexer,
    seen_init: SeenInit,
    else_propagate: bool,
}

impl Parser {
    pub fn new(lex: Lexer) -> Self {
        Self {
            lex,
            seen_init: SeenInit::default(),
            else_propagate: false,
        }
    }

    pub fn parse(mut self) -> Result<Block, Error> {
        self.parse_block_body(BlockKind::Root, true)
    }

    fn parse_expr(&mut self, start: Option<Token>) -> Result<Node, Error> {
        let tok = match start {
            Some(tok) => tok,
            None => self.lex.get_token()?,
        };

        if let Some(sym) = tok.symb()
            && self.needs_init(sym)
        {
            return self.parse_init(tok);
        }

        match tok {
            Token::Num(text) => {
                let num = Num::parse_decimal(&text)
                    .ok_or_else(|| parser_error(format!("invalid number literal: '{text}'")))?;
                Ok(Node::Lit(Literal::Num(num)))
            }
            Token::Str(text) => Ok(Node::Lit(Literal::Str(text))),
            Token::Bytes(bytes) => Ok(Node::Lit(Literal::Bytes(bytes))),
            Token::Symb(sym) => {
                if is_variable(&sym) {
                    return Ok(Node::Lit(Literal::Var(sym)));
                }
                if BLOCK_TOKS.contains(&sym.as_str()) {
                    return Err(parser_error(format!(
                        "error while parsing, block ({sym}) found, expression expected"
                    )));
                }
                if sym == "=" {
                    return self.parse_assign(Head::Assign, "=");
                }
                if sym == "~" {
                    return self.parse_assign(Head::PostAssign, "~");
                }

                let op = Op::from_symb(&sym)
                    .ok_or_else(|| parser_error(format!("symbol not implemented: '{sym}'")))?;
                let mut args = Vec::new();
                let mut arity = op.arity();
                while arity != 0 && self.lex.has_token() {
                    let next = self.lex.peek_token(0)?;

                    // Handle early symbol close `)` `;`.
                    if next.is_symb(")") {
                        self.lex.get_token()?;
                        break;
                    }
                    if next.is_symb(";") {
                        // Do not consume; it trickles up to the root.
                        break;
                    }
                    // Spaces only separate tokens.
                    if next.is_symb(" ") {
                        self.lex.get_token()?;
                        continue;
                    }

                    args.push(self.parse_expr(None)?);
                    arity -= 1;
                }
                Ok(Node::Expr {
                    head: Head::Op(op),
                    args,
                })
            }
        }
    }

    fn parse_assign(&mut self, head: Head, sym: &str) -> Result<Node, Error> {
        let target_tok = self.lex.get_token()?;
        let Some(target) = target_tok.symb().map(str::to_owned) else {
            return Err(parser_error(format!("expected symbol after '{sym}'")));
        };

        if is_variable(&target) {
            let value = self.parse_expr(None)?;
            return Ok(Node::Expr {
                head,
                args: vec![Node::Lit(Literal::Var(target)), value],
            });
        }

        // Function-head sugar: `=+z5` assigns `plus(z, 5)` to `z`. The
        // variable is peeked, not consumed, so it stays in the stream as the
        // function's first argument.
        if !Op::from_symb(&target).is_some_and(|op| op.arity() >= 1) {
            return Err(parser_error(format!(
                "expected variable or function after '{sym}'"
            )));
        }
        let assign_var = self.lex.peek_token(0)?;
        let Some(var) = assign_var
            .symb()
            .filter(|name| is_variable(name))
            .map(str::to_owned)
        else {
            return Err(parser_error(format!(
                "expected variable after '{sym}{target}'"
            )));
        };

        let call = self.parse_expr(Some(target_tok))?;
        Ok(Node::Expr {
            head,
            args: vec![Node::Lit(Literal::Var(var)), call],
        })
    }

    fn needs_init(&self, sym: &str) -> bool {
        match sym {
            "x" => !self.seen_init.x,
            "y" => !self.seen_init.y,
            "L" => !self.seen_init.lambda,
            _ => false,
        }
    }

    fn parse_init(&mut self, tok: Token) -> Result<Node, Error> {
        let (head, seen) = match tok.symb() {
            Some("x") => (Head::InitX, &mut self.seen_init.x),
            Some("y") => (Head::InitY, &mut self.seen_init.y),
            _ => (Head::InitL, &mut self.seen_init.lambda),
        };
        // Mark before parsing the initializer so a lambda body can recurse.
        *seen = true;

        let init_expr = self.parse_expr(None)?;
        let actual = self.parse_expr(Some(tok))?;
        let mut args = vec![init_expr];
        if let Node::Expr {
            args: invocation, ..
        } = actual
        {
            args.extend(invocation);
        }
        Ok(Node::Expr { head, args })
    }

    fn parse_block(&mut self) -> Result<Block, Error> {
        let tok = self.lex.get_token()?;
        let kind = match tok.symb() {
            Some("F") => {
                // An explicit loop variable when the next token names one,
                // otherwise the evaluator draws one from the lambda cycle.
                let next = self.lex.peek_token(0)?;
                let var = next
                    .symb()
                    .filter(|name| is_variable(name))
                    .map(str::to_owned);
                if var.is_some() {
                    self.lex.get_token()?;
                }
                let iter = Box::new(self.parse_expr(None)?);
                BlockKind::For { var, iter }
            }
            Some("I") => BlockKind::If {
                cond: Box::new(self.parse_expr(None)?),
            },
            Some("#") => BlockKind::Forever,
            Some("E") => BlockKind::Else,
            other => {
                return Err(parser_error(format!(
                    "expected block token, found {other:?}"
                )));
            }
        };
        self.parse_block_body(kind, false)
    }

    fn parse_block_body(&mut self, kind: BlockKind, root: bool) -> Result<Block, Error> {
        let mut block = Block::new(kind);
        let mut implicit_print = true;

        while self.lex.has_token() {
            let tok = self.lex.peek_token(0)?;
            let sym = tok.symb().map(str::to_owned);

            match sym.as_deref() {
                // Suppress autoprint.
                Some(" ") => {
                    self.lex.get_token()?;
                    implicit_print = false;
                }
                // Handle break: it also ends this block.
                Some("B") => {
                    self.lex.get_token()?;
                    block.children.push(Item {
                        node: Node::Block(Block::new(BlockKind::Break)),
                        print: false,
                    });
                    break;
                }
                // Handle else.
                Some("E") => {
                    // Either a block below just stopped at this `E`, or the
                    // previous child ended in a break (the for/else shape).
                    let after_break = ends_in_break(block.children.last());
                    if self.else_propagate || after_break {
                        let propagate = self.else_propagate;
                        self.else_propagate = false;
                        let else_block = Box::new(self.parse_block()?);
                        if propagate {
                            // The block that stopped at this `E` is the
                            // previous sibling; the branch is its else.
                            let Some(Item {
                                node: Node::Block(prev),
                                ..
                            }) = block.children.last_mut()
                            else {
                                return Err(parser_error("else used at root level"));
                            };
                            prev.else_block = Some(else_block);
                        } else if let Some(Item {
                            node: Node::Block(prev),
                            ..
                        }) = block.children.last_mut()
                            && matches!(prev.kind, BlockKind::For { .. } | BlockKind::Forever)
                        {
                            // `F...B E...`: the loop-else of the sibling loop.
                            prev.else_block = Some(else_block);
                        } else {
                            // `F I...B E...`: the break-ending child sits
                            // inside this block, so this block (the loop)
                            // owns the else.
                            block.else_block = Some(else_block);
                        }
                        implicit_print = true;
                    } else if root {
                        return Err(parser_error("else used at root level"));
                    } else {
                        // Not ours: stop and let the parent attach it.
                        self.else_propagate = true;
                        break;
                    }
                }
                Some(")" | ";") => {
                    // Ignore symbol exit if we're root.
                    if root {
                        self.lex.get_token()?;
                        continue;
                    }
                    // Do not consume `;` - it trickles up to the root.
                    if sym.as_deref() == Some(")") {
                        self.lex.get_token()?;
                    }
                    break;
                }
                Some("F" | "I" | "#") => {
                    let child = self.parse_block()?;
                    block.children.push(Item {
                        node: Node::Block(child),
                        print: false,
                    });
                    implicit_print = true;
                }
                _ => {
                    let expr = self.parse_expr(None)?;
                    let print = implicit_print && autoprints(&expr);
                    block.children.push(Item { node: expr, print });
                    implicit_print = true;
                }
            }
        }

        Ok(block)
    }
}

/// Whether an item is auto-printed when not suppressed by a space: `=`, `~`
/// and `p` heads never print, and neither does an `init-*` that only
/// defines (no invocation argument).
fn autoprints(expr: &Node) -> bool {
    match expr {
        Node::Expr { head, args } => match head {
            Head::Assign | Head::PostAssign | Head::Op(Op::Print) => false,
            Head::InitX | Head::InitY | Head::InitL => args.len() > 1,
            Head::Op(_) => true,
        },
        _ => true,
    }
}

fn ends_in_break(last: Option<&Item>) -> bool {
    let Some(Item {
        node: Node::Block(prev),
        ..
    }) = last
    else {
        return false;
    };
    matches!(
        prev.children.last(),
        Some(Item {
            node: Node::Block(Block {
                kind: BlockKind::Break,
                ..
            }),
            ..
        })
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::exception::ErrorKind;

    fn parse(src: &str) -> Result<Block, Error> {
        Parser::new(Lexer::new(src.as_bytes())).parse()
    }

    fn root_items(src: &str) -> Vec<Item> {
        parse(src).unwrap().children
    }

    #[test]
    fn every_operator_parses_with_exact_arity() {
        // Feeding each operator exactly its arity of zero-argument literals
        // leaves a well-formed single item and no stray tokens.
        let cases = [
            ("!", 1),
            ("&", 2),
            ("|", 2),
            ("?", 3),
            ("]", 1),
            (",", 2),
            ("_", 1),
            ("+", 2),
            ("-", 2),
            ("*", 2),
            ("^", 2),
            ("<", 2),
            (">", 2),
            ("`", 1),
            ("{", 1),
            ("}", 2),
            ("f", 2),
            ("h", 1),
            ("l", 1),
            ("m", 2),
            ("n", 2),
            ("o", 2),
            ("p", 1),
            ("q", 2),
            ("s", 1),
            ("t", 1),
            ("H", 1),
            ("S", 1),
            ("T", 1),
            ("U", 1),
            (".!", 1),
            (".<", 2),
            (".>", 2),
        ];
        for (sym, arity) in cases {
            let src = format!("{sym}{}", "1 ".repeat(arity).trim_end());
            let items = root_items(&src);
            assert_eq!(items.len(), 1, "one item for {src:?}");
            let Node::Expr { args, .. } = &items[0].node else {
                panic!("expected expression for {src:?}");
            };
            assert_eq!(args.len(), arity, "arity of {src:?}");
        }
    }

    #[test]
    fn block_token_as_expression_head_is_an_error() {
        let err = parse("+F5").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParserError);
    }

    #[test]
    fn unknown_symbol_is_an_error() {
        let err = parse("@1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParserError);
        assert!(err.message().contains("not implemented"));
    }

    #[test]
    fn space_suppresses_autoprint() {
        let items = root_items(" 1");
        assert_eq!(items.len(), 1);
        assert!(!items[0].print);
        assert!(root_items("1")[0].print);
    }

    #[test]
    fn never_autoprint_heads() {
        assert!(!root_items("=a5")[0].print);
        assert!(!root_items("~a5")[0].print);
        assert!(!root_items("p5")[0].print);
    }

    #[test]
    fn semicolon_unwinds_to_root() {
        // The `;` closes both open `[` levels; 10 is a fresh root item.
        let items = root_items("[[5;10");
        assert_eq!(items.len(), 2);
        let Node::Expr { args, .. } = &items[0].node else {
            panic!("expected list expression");
        };
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn init_happens_only_once() {
        let items = root_items("+x5xx");
        assert_eq!(items.len(), 2);
        let Node::Expr { args, .. } = &items[0].node else {
            panic!("expected plus expression");
        };
        // First argument is the init-x wrapper, second the plain reference.
        assert!(matches!(
            &args[0],
            Node::Expr {
                head: Head::InitX,
                ..
            }
        ));
        assert!(matches!(&args[1], Node::Lit(Literal::Var(v)) if v == "x"));
        // The trailing bare `x` is a plain reference too.
        assert!(matches!(&items[1].node, Node::Lit(Literal::Var(v)) if v == "x"));
    }

    #[test]
    fn define_only_init_does_not_print() {
        assert!(!root_items("x3")[0].print);
        assert!(!root_items("L0")[0].print);
        // An init-L with an invocation argument does print.
        assert!(root_items("L*5a2")[0].print);
    }

    #[test]
    fn assign_function_head_sugar() {
        let items = root_items("=+z5");
        let Node::Expr { head, args } = &items[0].node else {
            panic!("expected assignment");
        };
        assert_eq!(*head, Head::Assign);
        assert!(matches!(&args[0], Node::Lit(Literal::Var(v)) if v == "z"));
        let Node::Expr {
            head: Head::Op(Op::Plus),
            args: plus_args,
        } = &args[1]
        else {
            panic!("expected plus call");
        };
        assert!(matches!(&plus_args[0], Node::Lit(Literal::Var(v)) if v == "z"));
    }

    #[test]
    fn assign_to_non_variable_is_an_error() {
        assert_eq!(parse("=15").unwrap_err().kind(), ErrorKind::ParserError);
        assert_eq!(parse("=!1").unwrap_err().kind(), ErrorKind::ParserError);
    }

    #[test]
    fn else_at_root_is_an_error() {
        assert_eq!(parse("E5").unwrap_err().kind(), ErrorKind::ParserError);
    }

    #[test]
    fn else_attaches_to_if() {
        let items = root_items("I0 1E5");
        assert_eq!(items.len(), 1);
        let Node::Block(block) = &items[0].node else {
            panic!("expected if block");
        };
        assert!(matches!(block.kind, BlockKind::If { .. }));
        assert!(block.else_block.is_some());
    }

    #[test]
    fn else_after_break_attaches_to_the_loop() {
        let items = root_items("F9Iqa5BE1");
        let Node::Block(for_block) = &items[0].node else {
            panic!("expected for block");
        };
        assert!(matches!(for_block.kind, BlockKind::For { .. }));
        assert!(for_block.else_block.is_some());
        // The inner if keeps no else of its own.
        let Node::Block(if_block) = &for_block.children[0].node else {
            panic!("expected if block inside the loop");
        };
        assert!(if_block.else_block.is_none());
    }

    #[test]
    fn explicit_and_implicit_for_variables() {
        let items = root_items("FZ[1 2)Z");
        let Node::Block(block) = &items[0].node else {
            panic!("expected for block");
        };
        let BlockKind::For { var, .. } = &block.kind else {
            panic!("expected for kind");
        };
        assert_eq!(var.as_deref(), Some("Z"));

        let items = root_items("F5^a3");
        let Node::Block(block) = &items[0].node else {
            panic!("expected for block");
        };
        let BlockKind::For { var, .. } = &block.kind else {
            panic!("expected for kind");
        };
        assert!(var.is_none());
    }

    #[test]
    fn missing_arguments_close_early() {
        let items = root_items("+_42)");
        assert_eq!(items.len(), 1);
        let Node::Expr { args, .. } = &items[0].node else {
            panic!("expected plus expression");
        };
        assert_eq!(args.len(), 1);
    }
}
