//! Prompt compilation - substitute bound variables into a template
//!
//! Every `{{ key }}` whose key has a binding is replaced by the bound value,
//! literally. The scan is a single pass over the original text, so a value that
//! itself contains `{{other}}` is never substituted again. Placeholders without
//! a binding are left exactly as written.

use regex::{Captures, Regex, RegexBuilder};

use super::extract::PLACEHOLDER;
use crate::domain::{ChatMessage, Template, VariableBindings};

/// Upper bound for the compiled key alternation
const PATTERN_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// Compiles templates against one set of bindings
///
/// The key pattern is built once and reused for every message of a chat prompt.
pub struct PromptCompiler<'a> {
    bindings: &'a VariableBindings,
    pattern: Option<Regex>,
}

impl<'a> PromptCompiler<'a> {
    pub fn new(bindings: &'a VariableBindings) -> Self {
        Self {
            bindings,
            pattern: key_pattern(bindings),
        }
    }

    /// Compile a template into a new one of the same shape
    pub fn compile(&self, template: &Template) -> Template {
        match template {
            Template::Text(text) => Template::Text(self.compile_text(text)),
            Template::Chat(messages) => Template::Chat(self.compile_messages(messages)),
        }
    }

    fn compile_messages(&self, messages: &[ChatMessage]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|message| message.with_content(self.compile_text(&message.content)))
            .collect()
    }

    /// Substitute bound placeholders in a single string
    pub fn compile_text(&self, text: &str) -> String {
        if self.bindings.is_empty() {
            return text.to_string();
        }

        match &self.pattern {
            Some(pattern) => pattern
                .replace_all(text, |caps: &Captures| match self.bindings.get(&caps[1]) {
                    Some(value) => value.clone(),
                    None => caps[0].to_string(),
                })
                .into_owned(),
            // Key set too large for one pattern; match names the way extraction does
            None => PLACEHOLDER
                .replace_all(text, |caps: &Captures| match self.bindings.get(caps[1].trim()) {
                    Some(value) => value.clone(),
                    None => caps[0].to_string(),
                })
                .into_owned(),
        }
    }
}

/// `{{ <key1>|<key2>|... }}` with every key matched literally
fn key_pattern(bindings: &VariableBindings) -> Option<Regex> {
    if bindings.is_empty() {
        return None;
    }

    let alternatives = bindings.keys().map(|key| regex::escape(key)).collect::<Vec<_>>().join("|");
    let pattern = format!(r"\{{\{{\s*({alternatives})\s*\}}\}}");

    match RegexBuilder::new(&pattern).size_limit(PATTERN_SIZE_LIMIT).build() {
        Ok(regex) => Some(regex),
        Err(e) => {
            log::warn!("Falling back to placeholder scan for {} bindings: {}", bindings.len(), e);
            None
        }
    }
}

/// Compile a template with the given bindings
pub fn compile_prompt(template: &Template, bindings: &VariableBindings) -> Template {
    PromptCompiler::new(bindings).compile(template)
}

/// Compile a single string with the given bindings
pub fn compile_text(text: &str, bindings: &VariableBindings) -> String {
    PromptCompiler::new(bindings).compile_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::extract_variables;
    use serde_json::json;

    fn bindings(pairs: &[(&str, &str)]) -> VariableBindings {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_single_variable() {
        assert_eq!(compile_text("Hello {{name}}!", &bindings(&[("name", "Alice")])), "Hello Alice!");
    }

    #[test]
    fn test_multiple_variables() {
        let vars = bindings(&[("firstName", "John"), ("lastName", "Doe")]);
        assert_eq!(compile_text("Hello {{firstName}} {{lastName}}!", &vars), "Hello John Doe!");
    }

    #[test]
    fn test_whitespace_inside_placeholder() {
        assert_eq!(compile_text("{{ x }}", &bindings(&[("x", "V")])), "V");
        assert_eq!(compile_text("Value: {{  value  }}", &bindings(&[("value", "Test")])), "Value: Test");
    }

    #[test]
    fn test_repeated_variable() {
        let result = compile_text("Hello {{name}}! Nice to meet you {{name}}.", &bindings(&[("name", "Bob")]));
        assert_eq!(result, "Hello Bob! Nice to meet you Bob.");
    }

    #[test]
    fn test_unmatched_placeholder_survives() {
        let result = compile_text("Hello {{name}} from {{city}}!", &bindings(&[("name", "Alice")]));
        assert_eq!(result, "Hello Alice from {{city}}!");
    }

    #[test]
    fn test_empty_bindings_is_identity() {
        let empty = VariableBindings::new();
        assert_eq!(compile_text("Hello {{name}}!", &empty), "Hello {{name}}!");

        let chat = Template::Chat(vec![ChatMessage::user("Hello {{ name }}")]);
        assert_eq!(compile_prompt(&chat, &empty), chat);
    }

    #[test]
    fn test_empty_and_plain_text() {
        let vars = bindings(&[("name", "Alice")]);
        assert_eq!(compile_text("", &vars), "");
        assert_eq!(compile_text("Hello world!", &vars), "Hello world!");
    }

    #[test]
    fn test_values_inserted_literally() {
        let vars = bindings(&[("name", "Alice & Bob"), ("price", "$1 \\n ${name}")]);
        assert_eq!(compile_text("Hello {{name}}!", &vars), "Hello Alice & Bob!");
        assert_eq!(compile_text("Cost: {{price}}", &vars), "Cost: $1 \\n ${name}");
    }

    #[test]
    fn test_keys_with_regex_metacharacters() {
        let vars = bindings(&[("a.b", "dot"), ("x+", "plus")]);
        assert_eq!(compile_text("{{a.b}} {{axb}} {{x+}}", &vars), "dot {{axb}} plus");
    }

    #[test]
    fn test_substituted_value_not_reprocessed() {
        let vars = bindings(&[("a", "{{b}}"), ("b", "B")]);
        assert_eq!(compile_text("{{a}} and {{b}}", &vars), "{{b}} and B");

        let vars = bindings(&[("z", "{{a}}"), ("a", "A")]);
        assert_eq!(compile_text("{{z}}", &vars), "{{a}}");
    }

    #[test]
    fn test_idempotent_for_unmatched() {
        let vars = bindings(&[("name", "Alice")]);
        let once = compile_text("Hi {{name}} in {{city}}", &vars);
        assert_eq!(compile_text(&once, &vars), once);
    }

    #[test]
    fn test_prefix_keys_do_not_collide() {
        let vars = bindings(&[("user", "U"), ("user_name", "N")]);
        assert_eq!(compile_text("{{user}} {{user_name}} {{ user_name }}", &vars), "U N N");
    }

    #[test]
    fn test_triple_braces_keep_outer_brace() {
        assert_eq!(compile_text("{{{name}}}", &bindings(&[("name", "Alice")])), "{Alice}");
    }

    #[test]
    fn test_nested_braces_bind_innermost_placeholder() {
        // Extraction reads from the outer `{{`, substitution from the inner one
        let template = Template::from("{{ {{a}} }}");
        assert_eq!(extract_variables(&template), vec!["{{a"]);

        let compiled = compile_prompt(&template, &bindings(&[("a", "X")]));
        assert_eq!(compiled, Template::from("{{ X }}"));
        assert_eq!(extract_variables(&compiled), vec!["X"]);

        // Binding the extracted name consumes the outer placeholder instead
        let compiled = compile_prompt(&template, &bindings(&[("{{a", "X")]));
        assert_eq!(compiled, Template::from("X }}"));
        assert!(extract_variables(&compiled).is_empty());
    }

    #[test]
    fn test_extract_after_compile_drops_bound_names() {
        let template = Template::from("{{a}} {{b}} {{c}} {{a}}");
        let vars = bindings(&[("a", "1"), ("c", "3"), ("unused", "x")]);

        let compiled = compile_prompt(&template, &vars);
        assert_eq!(extract_variables(&compiled), vec!["b"]);
    }

    #[test]
    fn test_chat_shape_preserved_and_input_untouched() {
        let template = Template::Chat(vec![ChatMessage::system("You are {{role}}"), ChatMessage::user("Hi")]);
        let before = template.clone();

        let compiled = compile_prompt(&template, &bindings(&[("role", "assistant")]));

        assert_eq!(
            compiled,
            Template::Chat(vec![ChatMessage::system("You are assistant"), ChatMessage::user("Hi")])
        );
        assert_eq!(template, before);
    }

    #[test]
    fn test_chat_roles_and_extra_fields_copied() {
        let template = Template::Chat(vec![
            ChatMessage::new("{{role}}", "{{greeting}}").with_field("name", json!("{{greeting}}")),
        ]);

        let compiled = compile_prompt(&template, &bindings(&[("role", "x"), ("greeting", "Hello")]));
        let messages = compiled.as_chat().unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "{{role}}");
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[0].extra.get("name"), Some(&json!("{{greeting}}")));
    }

    #[test]
    fn test_empty_chat() {
        let compiled = compile_prompt(&Template::Chat(vec![]), &bindings(&[("name", "x")]));
        assert_eq!(compiled, Template::Chat(vec![]));
    }

    #[test]
    fn test_text_stays_text() {
        let compiled = compile_prompt(&Template::from("{{a}}"), &bindings(&[("a", "1")]));
        assert_eq!(compiled, Template::Text("1".to_string()));
    }

    #[test]
    fn test_compiler_reused_across_templates() {
        let vars = bindings(&[("n", "5")]);
        let compiler = PromptCompiler::new(&vars);
        assert_eq!(compiler.compile_text("{{n}}"), "5");
        assert_eq!(compiler.compile(&Template::from("n={{ n }}")), Template::from("n=5"));
    }
}
