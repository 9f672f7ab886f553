use pretty_assertions::assert_eq;

use cexpand::{ExpansionError, Macro, MacroSet, Symbol, TokenKind};

/// Build a function-like macro the way the directive layer would: lex the
/// body and turn every occurrence of a parameter name into a placeholder.
fn fn_macro(set: &mut MacroSet, name: &str, params: &[&str], body: &str) -> Macro {
  let name = set.intern(name);
  let params: Vec<Symbol> = params.iter().map(|p| set.intern(p)).collect();
  let mut replacement = set.lex(body).unwrap();

  for t in &mut replacement {
    if let TokenKind::Identifier(s) = t.kind {
      if let Some(i) = params.iter().position(|p| *p == s) {
        t.kind = TokenKind::Param(i as u32);
      }
    }
  }

  Macro::function(name, params.len() as u32, replacement)
}

fn obj_macro(set: &mut MacroSet, name: &str, body: &str) -> Macro {
  let name = set.intern(name);
  let replacement = set.lex(body).unwrap();
  Macro::object(name, replacement)
}

fn expand_source(set: &mut MacroSet, src: &str) -> Vec<String> {
  let mut list = set.lex(src).unwrap();
  set.expand(&mut list).unwrap();
  list
    .iter()
    .filter(|t| !matches!(t.kind, TokenKind::EmptyArg))
    .map(|t| t.spelling(set.interner()))
    .collect()
}

#[test]
fn object_like_rescan() {
  let mut set = MacroSet::new();
  let a = obj_macro(&mut set, "A", "B");
  let b = obj_macro(&mut set, "B", "42");
  set.define(a).unwrap();
  set.define(b).unwrap();

  assert_eq!(expand_source(&mut set, "A"), ["42"]);
}

#[test]
fn function_like_with_argument_pre_expansion() {
  let mut set = MacroSet::new();
  let sq = fn_macro(&mut set, "SQ", &["x"], "((x)*(x))");
  let n = obj_macro(&mut set, "N", "3");
  set.define(sq).unwrap();
  set.define(n).unwrap();

  assert_eq!(
    expand_source(&mut set, "SQ(N)"),
    ["(", "(", "3", ")", "*", "(", "3", ")", ")"]
  );
}

#[test]
fn self_disabling_stops_recursion() {
  let mut set = MacroSet::new();
  let f = obj_macro(&mut set, "F", "F");
  set.define(f).unwrap();

  assert_eq!(expand_source(&mut set, "F"), ["F"]);

  let mut set = MacroSet::new();
  let f = fn_macro(&mut set, "F", &["x"], "F(x+1)");
  set.define(f).unwrap();

  assert_eq!(expand_source(&mut set, "F(y)"), ["F", "(", "y", "+", "1", ")"]);
}

#[test]
fn stringify_ignores_pre_expansion() {
  let mut set = MacroSet::new();
  let str_m = fn_macro(&mut set, "STR", &["x"], "#x");
  let a = obj_macro(&mut set, "A", "1");
  set.define(str_m).unwrap();
  set.define(a).unwrap();

  assert_eq!(expand_source(&mut set, "STR(A)"), ["\"A\""]);
}

#[test]
fn paste_forms_a_single_token() {
  let mut set = MacroSet::new();
  let cat = fn_macro(&mut set, "CAT", &["a", "b"], "a##b");
  set.define(cat).unwrap();

  let mut list = set.lex("CAT(foo, 42)").unwrap();
  set.expand(&mut list).unwrap();

  assert_eq!(set.render(&list), "foo42");
  assert_eq!(list.len(), 1);
  assert!(matches!(list[0].kind, TokenKind::Identifier(_)));
}

#[test]
fn empty_paste_expands_to_nothing() {
  let mut set = MacroSet::new();
  let j = fn_macro(&mut set, "J", &["a", "b"], "a##b");
  set.define(j).unwrap();

  let mut list = set.lex("J(,)").unwrap();
  set.expand(&mut list).unwrap();
  assert_eq!(list, vec![]);
}

#[test]
fn dynamic_builtins_track_the_source_position() {
  let mut set = MacroSet::new();
  set.register_builtin_definitions().unwrap();

  set.set_location("main.c", 17);
  let mut list = set.lex("__FILE__ __LINE__").unwrap();
  set.expand(&mut list).unwrap();
  assert_eq!(set.render(&list), "\"main.c\" 17");

  set.set_line(18);
  let mut list = set.lex("__FILE__ __LINE__").unwrap();
  set.expand(&mut list).unwrap();
  assert_eq!(set.render(&list), "\"main.c\" 18");
}

#[test]
fn expansion_inside_larger_streams() {
  let mut set = MacroSet::new();
  set.register_builtin_definitions().unwrap();
  let max = fn_macro(&mut set, "MAX", &["a", "b"], "((a) > (b) ? (a) : (b))");
  let limit = obj_macro(&mut set, "LIMIT", "4096");
  set.define(max).unwrap();
  set.define(limit).unwrap();

  assert_eq!(
    expand_source(&mut set, "if (MAX(n, LIMIT) == LIMIT) return;"),
    [
      "if", "(", "(", "(", "n", ")", ">", "(", "4096", ")", "?", "(", "n", ")", ":", "(",
      "4096", ")", ")", "==", "4096", ")", "return", ";"
    ]
  );
}

#[test]
fn redefinition_laws() {
  let mut set = MacroSet::new();

  let m = obj_macro(&mut set, "M", "a + b");
  set.define(m).unwrap();

  let same = obj_macro(&mut set, "M", "a + b");
  set.define(same).unwrap();

  let different = obj_macro(&mut set, "M", "a - b");
  assert_eq!(set.define(different), Err(ExpansionError::Redefinition("M".into())));
}

#[test]
fn undef_reopens_the_name() {
  let mut set = MacroSet::new();

  let m = obj_macro(&mut set, "M", "1");
  set.define(m).unwrap();
  assert_eq!(expand_source(&mut set, "M"), ["1"]);

  let name = set.intern("M");
  set.undef(name);
  assert_eq!(expand_source(&mut set, "M"), ["M"]);

  let again = obj_macro(&mut set, "M", "2");
  set.define(again).unwrap();
  assert_eq!(expand_source(&mut set, "M"), ["2"]);
}

#[test]
fn expansion_of_a_fixed_point_is_idempotent() {
  let mut set = MacroSet::new();
  let sq = fn_macro(&mut set, "SQ", &["x"], "((x)*(x))");
  set.define(sq).unwrap();

  let mut list = set.lex("SQ(2) + rest").unwrap();
  set.expand(&mut list).unwrap();
  let once = list.clone();

  set.expand(&mut list).unwrap();
  assert_eq!(list, once);
}

#[test]
fn stringify_is_exported_for_error_directives() {
  let mut set = MacroSet::new();

  let list = set.lex("out of memory\n").unwrap();
  let message = set.stringify(&list);
  assert_eq!(message.kind, TokenKind::Str(set.intern("out of memory")));
}

#[test]
fn nested_macros_in_arguments() {
  let mut set = MacroSet::new();
  let add = fn_macro(&mut set, "ADD", &["a", "b"], "a + b");
  let neg = fn_macro(&mut set, "NEG", &["x"], "(-(x))");
  set.define(add).unwrap();
  set.define(neg).unwrap();

  assert_eq!(
    expand_source(&mut set, "ADD(NEG(1), 2)"),
    ["(", "-", "(", "1", ")", ")", "+", "2"]
  );
}

#[test]
fn macro_is_disabled_while_its_arguments_pre_expand() {
  // The name goes onto the disabling stack before the arguments are
  // pre-expanded, so an invocation surfacing inside an argument's own
  // expansion is left alone.
  let mut set = MacroSet::new();
  let add = fn_macro(&mut set, "ADD", &["a", "b"], "a + b");
  let one = obj_macro(&mut set, "ONE", "1");
  let two = obj_macro(&mut set, "TWO", "ADD(ONE, 1)");
  set.define(add).unwrap();
  set.define(one).unwrap();
  set.define(two).unwrap();

  assert_eq!(
    expand_source(&mut set, "ADD(TWO, ONE)"),
    ["ADD", "(", "1", ",", "1", ")", "+", "1"]
  );
}
