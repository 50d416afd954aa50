use crate::copy::{Schema, SchemaError, TypeId};

/// Parsed type expression such as `*subStruct`, `[]int`, `[4]int`, or `map[string]Hidden`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
	/// Reference to a named type.
	Named(String),
	/// `*T`
	Pointer(Box<TypeExpr>),
	/// `[]T`
	Sequence(Box<TypeExpr>),
	/// `[N]T`
	Array(usize, Box<TypeExpr>),
	/// `map[K]V`
	Map(Box<TypeExpr>, Box<TypeExpr>),
	/// `chan T`
	Channel(Box<TypeExpr>),
}

impl TypeExpr {
	/// Parse Go-like type syntax.
	pub fn parse(input: &str) -> Result<Self, SchemaError> {
		let mut parser = Parser {
			input,
			bytes: input.as_bytes(),
			idx: 0,
			depth: 0,
		};
		let expr = parser.expr()?;
		parser.skip_ws();
		if parser.idx != parser.bytes.len() {
			return Err(parser.invalid());
		}
		Ok(expr)
	}
}

impl Schema {
	/// Intern the type an expression denotes. Named leaves must already be registered.
	pub fn resolve(&mut self, expr: &TypeExpr) -> Result<TypeId, SchemaError> {
		match expr {
			TypeExpr::Named(name) => self.lookup(name).ok_or_else(|| SchemaError::TypeNotFound { name: name.clone() }),
			TypeExpr::Pointer(elem) => {
				let elem = self.resolve(elem)?;
				self.pointer(elem)
			}
			TypeExpr::Sequence(elem) => {
				let elem = self.resolve(elem)?;
				self.sequence(elem)
			}
			TypeExpr::Array(len, elem) => {
				let elem = self.resolve(elem)?;
				self.array(elem, *len)
			}
			TypeExpr::Map(key, value) => {
				let key = self.resolve(key)?;
				let value = self.resolve(value)?;
				self.map(key, value)
			}
			TypeExpr::Channel(elem) => {
				let elem = self.resolve(elem)?;
				self.channel(elem)
			}
		}
	}

	/// Parse and intern a type expression.
	pub fn resolve_expr(&mut self, input: &str) -> Result<TypeId, SchemaError> {
		let expr = TypeExpr::parse(input)?;
		self.resolve(&expr)
	}
}

/// Deepest nesting of type constructors an expression may use.
const MAX_EXPR_DEPTH: usize = 64;

struct Parser<'a> {
	input: &'a str,
	bytes: &'a [u8],
	idx: usize,
	depth: usize,
}

impl<'a> Parser<'a> {
	fn expr(&mut self) -> Result<TypeExpr, SchemaError> {
		if self.depth >= MAX_EXPR_DEPTH {
			return Err(self.invalid());
		}
		self.depth += 1;
		let expr = self.term();
		self.depth -= 1;
		expr
	}

	fn term(&mut self) -> Result<TypeExpr, SchemaError> {
		self.skip_ws();
		match self.peek() {
			Some(b'*') => {
				self.idx += 1;
				Ok(TypeExpr::Pointer(Box::new(self.expr()?)))
			}
			Some(b'[') => {
				self.idx += 1;
				let start = self.idx;
				while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
					self.idx += 1;
				}
				let input = self.input;
				let digits = &input[start..self.idx];
				self.expect(b']')?;
				let elem = Box::new(self.expr()?);
				if digits.is_empty() {
					return Ok(TypeExpr::Sequence(elem));
				}
				let len = digits.parse::<usize>().map_err(|_| self.invalid())?;
				Ok(TypeExpr::Array(len, elem))
			}
			Some(byte) if is_ident_start(byte) => {
				let ident = self.ident();
				match ident {
					"map" if self.peek() == Some(b'[') => {
						self.idx += 1;
						let key = self.expr()?;
						self.skip_ws();
						self.expect(b']')?;
						let value = self.expr()?;
						Ok(TypeExpr::Map(Box::new(key), Box::new(value)))
					}
					"chan" if self.peek().is_some_and(|byte| byte == b' ' || byte == b'*' || byte == b'[') => Ok(TypeExpr::Channel(Box::new(self.expr()?))),
					_ => Ok(TypeExpr::Named(ident.to_owned())),
				}
			}
			_ => Err(self.invalid()),
		}
	}

	fn ident(&mut self) -> &'a str {
		let input = self.input;
		let start = self.idx;
		while self.peek().is_some_and(|byte| byte.is_ascii_alphanumeric() || byte == b'_') {
			self.idx += 1;
		}
		&input[start..self.idx]
	}

	fn expect(&mut self, byte: u8) -> Result<(), SchemaError> {
		if self.peek() != Some(byte) {
			return Err(self.invalid());
		}
		self.idx += 1;
		Ok(())
	}

	fn peek(&self) -> Option<u8> {
		self.bytes.get(self.idx).copied()
	}

	fn skip_ws(&mut self) {
		while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
			self.idx += 1;
		}
	}

	fn invalid(&self) -> SchemaError {
		SchemaError::InvalidTypeExpr {
			expr: self.input.to_owned(),
		}
	}
}

fn is_ident_start(byte: u8) -> bool {
	byte.is_ascii_alphabetic() || byte == b'_'
}

#[cfg(test)]
mod tests {
	use super::TypeExpr;
	use crate::copy::{ScalarKind, Schema, SchemaError, Shape};

	#[test]
	fn nested_expression_parses() {
		let expr = TypeExpr::parse("map[string][]*subStruct").expect("expression parses");
		assert_eq!(
			expr,
			TypeExpr::Map(
				Box::new(TypeExpr::Named("string".to_owned())),
				Box::new(TypeExpr::Sequence(Box::new(TypeExpr::Pointer(Box::new(TypeExpr::Named("subStruct".to_owned()))))))
			)
		);
	}

	#[test]
	fn array_and_channel_parse() {
		assert_eq!(
			TypeExpr::parse("[3]int").expect("array parses"),
			TypeExpr::Array(3, Box::new(TypeExpr::Named("int".to_owned())))
		);
		assert_eq!(
			TypeExpr::parse("chan int").expect("channel parses"),
			TypeExpr::Channel(Box::new(TypeExpr::Named("int".to_owned())))
		);
	}

	#[test]
	fn identifiers_starting_with_keywords_stay_named() {
		assert_eq!(TypeExpr::parse("mapping").expect("parses"), TypeExpr::Named("mapping".to_owned()));
		assert_eq!(TypeExpr::parse("channel").expect("parses"), TypeExpr::Named("channel".to_owned()));
	}

	#[test]
	fn malformed_expressions_are_rejected() {
		for input in ["", "*", "[x]int", "[3", "map[string", "int]", "map[string]"] {
			assert!(
				matches!(TypeExpr::parse(input), Err(SchemaError::InvalidTypeExpr { .. })),
				"expected {input:?} to be rejected"
			);
		}
	}

	#[test]
	fn nesting_is_bounded() {
		let deep = format!("{}int", "*".repeat(10_000));
		assert!(matches!(TypeExpr::parse(&deep), Err(SchemaError::InvalidTypeExpr { .. })));

		let deep_maps = format!("{}int", "map[".repeat(5_000));
		assert!(matches!(TypeExpr::parse(&deep_maps), Err(SchemaError::InvalidTypeExpr { .. })));

		let shallow = format!("{}int", "[]*".repeat(20));
		TypeExpr::parse(&shallow).expect("40 levels parse");
	}

	#[test]
	fn resolve_interns_literals() {
		let mut schema = Schema::new();
		let first = schema.resolve_expr("[]*int").expect("resolves");
		let second = schema.resolve_expr(" [] *int ").expect("resolves");
		assert_eq!(first, second);

		let int = schema.scalar(ScalarKind::Int);
		let ptr = schema.pointer(int).expect("pointer type");
		assert_eq!(schema.def(first).expect("registered").shape, Shape::Sequence { elem: ptr });
	}

	#[test]
	fn resolve_reports_unknown_names() {
		let mut schema = Schema::new();
		let err = schema.resolve_expr("*Missing").expect_err("unknown name fails");
		assert!(matches!(err, SchemaError::TypeNotFound { name } if name == "Missing"));
	}
}
