//! Public interface for running Pyth code, and the tree-walk evaluator.
//!
//! A [`Runner`] parses once and can run many times; every run starts from a
//! fresh preset environment, so sequential runs are independent. The
//! evaluator is a recursive walk over the block tree: operators with eager
//! arguments go through [`builtins::apply`], while the lazy and
//! body-taking operators (`? & |`, `m f o`, `p`, `L`) are handled here
//! because they need unevaluated branches, the environment or the output
//! writer.

use std::rc::Rc;

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::{
    builtins::{self, makeiter},
    exception::{Error, RunError, RunResult, name_error, value_error},
    expressions::{Block, BlockKind, Head, Item, Literal, Node, Op},
    io::{CollectStringPrint, PrintWriter},
    lexer::Lexer,
    parse::Parser,
    value::{Lambda, Value},
};

/// The lambda-variable cycle shared by `m`, `f`, `o` and implicit `F`
/// loops: one fresh name per nesting level, restored on exit.
const LAMBDA_VARS: [&str; 5] = ["a", "b", "c", "d", "e"];

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";
const QWERTY: &str = "qwertyuiopasdfghjklzxcvbnm";

/// Primary interface for running Pyth code.
///
/// # Example
/// ```
/// use pyth::{CollectStringPrint, Runner};
///
/// let runner = Runner::new(b"+3 5").unwrap();
/// let mut print = CollectStringPrint::new();
/// runner.run("", &mut print).unwrap();
/// assert_eq!(print.output(), "8\n");
/// ```
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Runner {
    /// The preprocessed source (stage 1 + 2 of the lexer), kept for the
    /// CLI's debug dump.
    source: String,
    program: Block,
}

impl Runner {
    /// Preprocesses and parses the given source bytes.
    ///
    /// # Errors
    /// Returns an `Error` of kind `LexerError` or `ParserError` when the
    /// source cannot be tokenized or parsed.
    pub fn new(source: &[u8]) -> Result<Self, Error> {
        let lexer = Lexer::new(source);
        let preprocessed = String::from_utf8_lossy(lexer.preprocessed_source()).into_owned();
        let program = Parser::new(lexer).parse()?;
        Ok(Self {
            source: preprocessed,
            program,
        })
    }

    /// The normalized source this runner was built from.
    #[must_use]
    pub fn preprocessed_source(&self) -> &str {
        &self.source
    }

    /// A pseudocode rendering of the parsed program, as shown by `pyth -d`.
    #[must_use]
    pub fn program_dump(&self) -> String {
        self.program.dump()
    }

    /// Serializes the parsed program to a binary format, so a host can
    /// cache it and skip re-parsing.
    pub fn dump(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    /// Deserializes a runner from [`dump`](Self::dump) output.
    pub fn load(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }

    /// Runs the program against a fresh environment, writing output through
    /// `print`.
    ///
    /// # Errors
    /// Returns the first uncaught runtime error; whatever the program
    /// printed before the failure has already reached `print`.
    pub fn run(&self, stdin: &str, print: &mut impl PrintWriter) -> Result<(), Error> {
        let mut evaluator = Evaluator::new(stdin, print);
        evaluator
            .run_items(&self.program.children)
            .map_err(RunError::into_error)
    }
}

/// Runs a program in one step, capturing stdout.
///
/// Returns the captured output (partial output survives a failure) together
/// with the error, if any.
#[must_use]
pub fn interpret(source: &[u8], stdin: &str) -> (String, Option<Error>) {
    let mut print = CollectStringPrint::new();
    let error = match Runner::new(source) {
        Ok(runner) => runner.run(stdin, &mut print).err(),
        Err(err) => Some(err),
    };
    (print.into_output(), error)
}

/// The preset variables every run starts from.
fn preset_environment() -> AHashMap<String, Value> {
    let mut env = AHashMap::new();
    let mut set = |name: &str, value: Value| {
        env.insert(name.to_owned(), value);
    };
    set("Z", Value::int(0));
    set("z", Value::int(0));
    set("e", Value::int(10));
    set("w", Value::list(vec![]));
    set("d", Value::str(""));
    set("c", Value::str(" "));
    set("k", Value::str(""));
    set("b", Value::str("\n"));
    set("a", Value::str(ALPHABET));
    set("$a", Value::str(ALPHABET));
    set("$A", Value::str(ALPHABET.to_uppercase()));
    set("$q", Value::str(QWERTY));
    set("$Q", Value::str(QWERTY.to_uppercase()));
    env
}

struct Evaluator<'w, W: PrintWriter> {
    env: AHashMap<String, Value>,
    /// Current lambda-variable nesting depth.
    depth: usize,
    /// Input text supplied by the front-end. Carried for interface parity
    /// with the reference CLI; no operator in the current table reads it.
    #[expect(dead_code, reason = "kept for front-end parity until an input operator lands")]
    stdin: String,
    print: &'w mut W,
}

impl<'w, W: PrintWriter> Evaluator<'w, W> {
    fn new(stdin: &str, print: &'w mut W) -> Self {
        Self {
            env: preset_environment(),
            depth: 0,
            stdin: stdin.to_owned(),
            print,
        }
    }

    fn run_items(&mut self, items: &[Item]) -> RunResult<()> {
        for item in items {
            if let Node::Block(block) = &item.node {
                self.eval_block(block)?;
            } else {
                let value = self.eval_expr(&item.node)?;
                if item.print && !matches!(value, Value::Nil) {
                    self.print.stdout_write(value.render().into())?;
                    self.print.stdout_push('\n')?;
                }
            }
        }
        Ok(())
    }

    fn eval_block(&mut self, block: &Block) -> RunResult<()> {
        match &block.kind {
            BlockKind::Break => Err(RunError::Break),
            BlockKind::If { cond } => {
                if self.eval_expr(cond)?.is_truthy() {
                    self.run_items(&block.children)
                } else if let Some(else_block) = &block.else_block {
                    self.run_else(else_block)
                } else {
                    Ok(())
                }
            }
            BlockKind::For { var, iter } => {
                let iterable = self.eval_expr(iter)?;
                let items = makeiter(&iterable)?;
                // An explicit variable binds as-is (and stays bound after
                // the loop); an implicit one comes from the cycle.
                let (name, implicit) = match var {
                    Some(name) => (name.clone(), false),
                    None => (LAMBDA_VARS[self.depth % LAMBDA_VARS.len()].to_owned(), true),
                };
                let mut broke = false;
                for value in items {
                    self.env.insert(name.clone(), value);
                    if implicit {
                        self.depth += 1;
                    }
                    let result = self.run_items(&block.children);
                    if implicit {
                        self.depth -= 1;
                    }
                    match result {
                        Ok(()) => {}
                        Err(RunError::Break) => {
                            broke = true;
                            break;
                        }
                        Err(err) => return Err(err),
                    }
                }
                if !broke && let Some(else_block) = &block.else_block {
                    self.run_else(else_block)?;
                }
                Ok(())
            }
            BlockKind::Forever => {
                // A break or any runtime error terminates the loop
                // normally; its else branch can never run.
                while self.run_items(&block.children).is_ok() {}
                Ok(())
            }
            BlockKind::Root | BlockKind::Else => self.run_items(&block.children),
        }
    }

    fn run_else(&mut self, else_block: &Block) -> RunResult<()> {
        self.run_items(&else_block.children)?;
        if let Some(nested) = &else_block.else_block {
            self.run_else(nested)?;
        }
        Ok(())
    }

    fn eval_expr(&mut self, node: &Node) -> RunResult<Value> {
        match node {
            Node::Lit(Literal::Num(n)) => Ok(Value::Num(n.clone())),
            Node::Lit(Literal::Str(s)) => Ok(Value::str(s.as_str())),
            Node::Lit(Literal::Bytes(bytes)) => Ok(Value::list(
                bytes.iter().map(|&b| Value::int(i64::from(b))).collect(),
            )),
            Node::Lit(Literal::Var(name)) => {
                self.env.get(name).cloned().ok_or_else(|| name_error(name))
            }
            Node::Expr { head, args } => match head {
                Head::Assign => {
                    let value = self.eval_expr(&args[1])?;
                    self.assign(&args[0], value.clone())?;
                    Ok(value)
                }
                Head::PostAssign => {
                    let value = self.eval_expr(&args[1])?;
                    let previous = self.assign(&args[0], value)?;
                    Ok(previous)
                }
                Head::InitX => self.init_var("x", &args[0]),
                Head::InitY => self.init_var("y", &args[0]),
                Head::InitL => {
                    let lambda = Rc::new(Lambda {
                        param: "a",
                        body: args[0].clone(),
                    });
                    self.env
                        .insert("L".to_owned(), Value::Lambda(lambda.clone()));
                    if let Some(invocation) = args.get(1) {
                        let arg = self.eval_expr(invocation)?;
                        self.call_lambda(&lambda, arg)
                    } else {
                        Ok(Value::Lambda(lambda))
                    }
                }
                Head::Op(op) => self.eval_op(*op, args),
            },
            Node::Block(_) => Err(value_error("block in expression position")),
        }
    }

    /// Writes through an assignment target, returning the previous value
    /// (or `Nil`).
    fn assign(&mut self, target: &Node, value: Value) -> RunResult<Value> {
        let Node::Lit(Literal::Var(name)) = target else {
            return Err(value_error("assignment target must be a variable"));
        };
        Ok(self
            .env
            .insert(name.clone(), value)
            .unwrap_or(Value::Nil))
    }

    fn init_var(&mut self, name: &str, init: &Node) -> RunResult<Value> {
        let value = self.eval_expr(init)?;
        self.env.insert(name.to_owned(), value.clone());
        Ok(value)
    }

    fn eval_op(&mut self, op: Op, args: &[Node]) -> RunResult<Value> {
        match op {
            Op::And => {
                let first = self.eval_optional(args.first())?;
                if !first.is_truthy() {
                    return Ok(first);
                }
                self.eval_optional(args.get(1))
            }
            Op::Or => {
                let first = self.eval_optional(args.first())?;
                if first.is_truthy() {
                    return Ok(first);
                }
                self.eval_optional(args.get(1))
            }
            Op::Ternary => {
                let cond = self.eval_optional(args.first())?;
                let branch = if cond.is_truthy() { args.get(1) } else { args.get(2) };
                self.eval_optional(branch)
            }
            Op::Print => {
                let value = self.eval_optional(args.first())?;
                if !matches!(value, Value::Nil) {
                    self.print.stdout_write(value.render().into())?;
                }
                Ok(value)
            }
            Op::Lambda => {
                let lambda = match self.env.get("L") {
                    Some(Value::Lambda(lambda)) => lambda.clone(),
                    Some(_) => return Err(value_error("'L' is not callable")),
                    None => return Err(name_error("L")),
                };
                let arg = self.eval_optional(args.first())?;
                self.call_lambda(&lambda, arg)
            }
            Op::Map => self.eval_map(args),
            Op::Filter => self.eval_filter(args),
            Op::OrderBy => self.eval_order_by(args),
            eager => {
                let mut values: SmallVec<[Value; 3]> = SmallVec::new();
                for arg in args {
                    values.push(self.eval_expr(arg)?);
                }
                while (values.len() as i32) < eager.arity() {
                    values.push(Value::Nil);
                }
                builtins::apply(eager, &values)
            }
        }
    }

    fn eval_optional(&mut self, node: Option<&Node>) -> RunResult<Value> {
        node.map_or(Ok(Value::Nil), |node| self.eval_expr(node))
    }

    /// Calls the `L` lambda: the parameter binding is saved and restored so
    /// recursive bodies see their own argument.
    fn call_lambda(&mut self, lambda: &Lambda, arg: Value) -> RunResult<Value> {
        let saved = self.env.insert(lambda.param.to_owned(), arg);
        let result = self.eval_expr(&lambda.body);
        match saved {
            Some(value) => {
                self.env.insert(lambda.param.to_owned(), value);
            }
            None => {
                self.env.remove(lambda.param);
            }
        }
        result
    }

    /// Runs `f` with a fresh cycle variable bound for the duration,
    /// restoring both the variable and the depth afterwards.
    fn with_cycle_var<T>(
        &mut self,
        f: impl FnOnce(&mut Self, &'static str) -> RunResult<T>,
    ) -> RunResult<T> {
        let var = LAMBDA_VARS[self.depth % LAMBDA_VARS.len()];
        let saved = self.env.get(var).cloned();
        self.depth += 1;
        let result = f(self, var);
        self.depth -= 1;
        match saved {
            Some(value) => {
                self.env.insert(var.to_owned(), value);
            }
            None => {
                self.env.remove(var);
            }
        }
        result
    }

    fn eval_map(&mut self, args: &[Node]) -> RunResult<Value> {
        let [seq, body] = args else {
            return Err(value_error("m expects a sequence and a body"));
        };
        let seq = self.eval_expr(seq)?;
        let items = makeiter(&seq)?;
        self.with_cycle_var(|ev, var| {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                ev.env.insert(var.to_owned(), item);
                out.push(ev.eval_expr(body)?);
            }
            Ok(Value::list(out))
        })
    }

    fn eval_filter(&mut self, args: &[Node]) -> RunResult<Value> {
        let (seq, body) = match args {
            [seq, body] => (Some(self.eval_expr(seq)?), body),
            [body] => (None, body),
            _ => return Err(value_error("f expects a body")),
        };
        match seq {
            Some(seq @ (Value::Str(_) | Value::List(_))) => {
                let items = makeiter(&seq)?;
                self.with_cycle_var(|ev, var| {
                    let mut kept = Vec::new();
                    for item in items {
                        ev.env.insert(var.to_owned(), item.clone());
                        if ev.eval_expr(body)?.is_truthy() {
                            kept.push(item);
                        }
                    }
                    Ok(builtins::rebuild_seq(&seq, kept))
                })
            }
            // With a real (or no sequence at all) `f` searches for the
            // first integer satisfying the body, from floor(r) (or 1) up.
            Some(Value::Num(n)) => {
                let start = n.floor_i64()?;
                self.first_satisfying(body, start)
            }
            None => self.first_satisfying(body, 1),
            Some(other) => Err(builtins::bad_type("Pfilter", &[&other])),
        }
    }

    fn first_satisfying(&mut self, body: &Node, start: i64) -> RunResult<Value> {
        self.with_cycle_var(|ev, var| {
            let mut candidate = start;
            loop {
                ev.env.insert(var.to_owned(), Value::int(candidate));
                if ev.eval_expr(body)?.is_truthy() {
                    return Ok(Value::int(candidate));
                }
                candidate += 1;
            }
        })
    }

    fn eval_order_by(&mut self, args: &[Node]) -> RunResult<Value> {
        let [seq, body] = args else {
            return Err(value_error("o expects a sequence and a body"));
        };
        let seq = self.eval_expr(seq)?;
        let items = makeiter(&seq)?;
        let mut keyed = self.with_cycle_var(|ev, var| {
            let mut keyed = Vec::with_capacity(items.len());
            for item in items {
                ev.env.insert(var.to_owned(), item.clone());
                keyed.push((ev.eval_expr(body)?, item));
            }
            Ok(keyed)
        })?;

        let mut incomparable: Option<RunError> = None;
        keyed.sort_by(|(key_a, _), (key_b, _)| {
            key_a.try_cmp(key_b).unwrap_or_else(|| {
                if incomparable.is_none() {
                    incomparable = Some(builtins::bad_type("order_by", &[key_a, key_b]));
                }
                std::cmp::Ordering::Equal
            })
        });
        if let Some(err) = incomparable {
            return Err(err);
        }
        Ok(builtins::rebuild_seq(
            &seq,
            keyed.into_iter().map(|(_, item)| item).collect(),
        ))
    }
}
