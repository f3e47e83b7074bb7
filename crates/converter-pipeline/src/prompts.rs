//! Role instructions and task payloads for each stage
//!
//! Instructions are parameterized by the dialect pair; payloads always carry
//! the original query so every stage can ground its answer in it.

use converter_core::DialectPair;

/// ANSI base data types the validator is allowed to emit.
pub const ANSI_DATA_TYPES: &[&str] = &[
    "CHARACTER",
    "VARCHAR",
    "CHARACTER LARGE OBJECT",
    "NCHAR",
    "NCHAR VARYING",
    "BINARY",
    "BINARY VARYING",
    "BINARY LARGE OBJECT",
    "NUMERIC",
    "DECIMAL",
    "SMALLINT",
    "INTEGER",
    "BIGINT",
    "FLOAT",
    "REAL",
    "DOUBLE PRECISION",
    "BOOLEAN",
    "DATE",
    "TIME",
    "TIMESTAMP",
    "INTERVAL",
];

/// Dialect-specific constructs and their standard replacements.
pub const SUBSTITUTION_RULES: &[(&str, &str)] = &[
    ("ILIKE", "LOWER(column) LIKE LOWER(value)"),
    (
        "QUALIFY",
        "a WHERE filter over a derived column holding the window function result",
    ),
    (
        "ASOF JOIN / MATCH_CONDITION",
        "a correlated subquery or a window-function based join",
    ),
    ("LIMIT n", "FETCH FIRST n ROWS ONLY"),
];

fn substitution_list() -> String {
    SUBSTITUTION_RULES
        .iter()
        .map(|(from, to)| format!("   - {} => {}", from, to))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn structuring_instruction(dialects: &DialectPair) -> String {
    format!(
        r#"Role: You build abstract syntax trees for {source} SQL.

Task: Convert exactly one {source} SQL query into a JSON syntax tree.

Rules:
 1) Represent every clause present in the query (SELECT, FROM, JOIN, WHERE, GROUP BY, HAVING, QUALIFY, ORDER BY, LIMIT, window specifications). Do not drop or reorder elements.
 2) Represent {source}-specific keywords such as ILIKE, QUALIFY, ASOF JOIN and MATCH_CONDITION explicitly, for example under an "operator" or "join_type" key.
 3) Nest conditions, subqueries, aliases and function calls so the tree mirrors the logical structure of the query.
 4) Name keys deterministically and consistently: use snake_case, start the root with "type", and keep the same key for the same concept everywhere (e.g. "select_statement", "select_list", "from_clause", "where_clause", "order_by_clause").
 5) When a construct is ambiguous, pick one representation that preserves intent and use it consistently.

Output:
 - Raw JSON only, parseable by a standard JSON parser.
 - No code fences, no markdown, no commentary before or after the JSON.
 - End the output at the closing brace of the root object."#,
        source = dialects.source,
    )
}

pub fn structuring_payload(input_text: &str) -> String {
    format!("SQL to parse:\n{}", input_text)
}

pub fn transformation_instruction(dialects: &DialectPair) -> String {
    format!(
        r#"Role: You translate {source} SQL into {target} SQL.

Task: Given the original {source} query and its JSON syntax tree, produce one logically equivalent {target} SQL statement.

Rules:
 1) Use the syntax tree for structure and fall back to the original query wherever the tree is incomplete, ambiguous or reports an error.
 2) Replace {source}-specific constructs with standard equivalents:
{rules}
 3) Keep every column, alias, expression, filter, grouping and ordering. Do not rename or omit anything.
 4) Approximate {source}-only functions and data types with standard ones; never remove them silently.
 5) Common table expressions and subqueries are allowed when they keep the logic clear.
 6) Produce a single complete statement that runs directly on a {target} engine.

Output:
 - Only the {target} SQL statement.
 - No code fences, no JSON, no commentary."#,
        source = dialects.source,
        target = dialects.target,
        rules = substitution_list(),
    )
}

pub fn transformation_payload(dialects: &DialectPair, input_text: &str, tree: &str) -> String {
    format!(
        "Original {} SQL:\n{}\n\nAST:\n{}",
        dialects.source, input_text, tree
    )
}

pub fn validation_instruction(dialects: &DialectPair) -> String {
    format!(
        r#"Role: You validate {target} SQL translations of {source} SQL.

Task: Compare the original {source} query with the candidate {target} statement. Verify that:
 1) Both return the same rows, in the same order, with the same columns and aliases.
 2) Every {source}-specific construct has been replaced correctly:
{rules}
 3) Only standard clauses, keywords and data types are used. Allowed data types: {types}.
 4) The statement is syntactically complete: balanced parentheses, no stray text, no code fences.

If the candidate is correct, return it unchanged. Otherwise return the corrected statement.

Output:
 - Exactly one {target} SQL statement.
 - No code fences, no explanation, nothing after the statement."#,
        source = dialects.source,
        target = dialects.target,
        rules = substitution_list(),
        types = ANSI_DATA_TYPES.join(", "),
    )
}

pub fn validation_payload(dialects: &DialectPair, input_text: &str, candidate: &str) -> String {
    format!(
        "Original {} SQL:\n{}\n\n{} SQL:\n{}",
        dialects.source, input_text, dialects.target, candidate
    )
}
