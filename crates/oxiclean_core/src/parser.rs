use dashmap::DashMap;
use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::ExtractError,
    types::{ImportNode, SourceLocation, SpecKind},
};

/// Reads `file` and returns its import nodes in source order.
///
/// Successful extractions are memoized in `cache`; failures are not, so a caller
/// always sees the same error for the same broken file.
pub fn imports_for(
    file: &Path,
    cache: &DashMap<PathBuf, Vec<ImportNode>>,
) -> Result<Vec<ImportNode>, ExtractError> {
    if let Some(v) = cache.get(file) {
        trace!("Cache hit for imports: {}", file.display());
        return Ok(v.clone());
    }
    trace!("Parsing file for imports: {}", file.display());
    let src = fs::read_to_string(file)
        .map_err(|source| ExtractError::Read { path: file.to_path_buf(), source })?;

    let imports = extract_imports(file, &src)?;
    cache.insert(file.to_path_buf(), imports.clone());
    Ok(imports)
}

/// Parses `src` as the contents of `file` and lists every import specifier that
/// appears at module level.
///
/// Any syntax error rejects the whole file, a partially recovered AST is never used.
pub fn extract_imports(file: &Path, src: &str) -> Result<Vec<ImportNode>, ExtractError> {
    let source_type = SourceType::from_path(file).unwrap_or_default();
    let allocator = Allocator::default();
    let ParserReturn { program, errors, panicked, .. } =
        OxcParser::new(&allocator, src, source_type).parse();

    if panicked || !errors.is_empty() {
        let message = errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "parser aborted".to_string());
        debug!("{} syntax error(s) in {}", errors.len(), file.display());
        return Err(ExtractError::Parse { path: file.to_path_buf(), message });
    }

    let mut collector = ImportCollector::new(src);
    for stmt in &program.body {
        collector.statement(stmt);
    }

    let imports = collector.finish();
    debug!("Found {} import specifiers in {}", imports.len(), file.display());
    Ok(imports)
}

struct ImportCollector<'s> {
    src: &'s str,
    line_starts: Vec<u32>,
    nodes: Vec<ImportNode>,
}

impl<'s> ImportCollector<'s> {
    fn new(src: &'s str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            src.bytes().enumerate().filter(|(_, b)| *b == b'\n').map(|(i, _)| i as u32 + 1),
        );
        Self { src, line_starts, nodes: Vec::new() }
    }

    fn finish(mut self) -> Vec<ImportNode> {
        // Nested requires are discovered callee-last, restore source order
        self.nodes.sort_by_key(|n| n.location.start);
        self.nodes
    }

    fn push(&mut self, literal: &StringLiteral, kind: SpecKind) {
        trace!("Found {:?} import: '{}'", kind, literal.value);
        let location = self.locate(literal.span.start, literal.span.end);
        self.nodes.push(ImportNode { request: literal.value.to_string(), kind, location });
    }

    fn locate(&self, start: u32, end: u32) -> SourceLocation {
        let line_idx = self.line_starts.partition_point(|&s| s <= start).saturating_sub(1);
        let line_start = self.line_starts[line_idx] as usize;
        let column =
            self.src.get(line_start..start as usize).map(|s| s.chars().count()).unwrap_or(0);
        SourceLocation { start, end, line: line_idx as u32 + 1, column: column as u32 + 1 }
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::ImportDeclaration(decl) => {
                if decl.import_kind.is_type() {
                    trace!("Skipping type-only import of '{}'", decl.source.value);
                    return;
                }
                // `import { type A, type B } from 'x'` is erased as well,
                // a bare `import 'x'` has no specifiers and always loads
                let loads_at_runtime = match &decl.specifiers {
                    Some(specifiers) if !specifiers.is_empty() => {
                        specifiers.iter().any(|spec| match spec {
                            ImportDeclarationSpecifier::ImportSpecifier(s) => {
                                !s.import_kind.is_type()
                            }
                            ImportDeclarationSpecifier::ImportDefaultSpecifier(_)
                            | ImportDeclarationSpecifier::ImportNamespaceSpecifier(_) => true,
                        })
                    }
                    _ => true,
                };
                if loads_at_runtime {
                    self.push(&decl.source, SpecKind::Static);
                }
            }
            Statement::ExportNamedDeclaration(decl) => {
                if let Some(source) = &decl.source {
                    let all_types = !decl.specifiers.is_empty()
                        && decl.specifiers.iter().all(|s| s.export_kind.is_type());
                    if decl.export_kind.is_type() || all_types {
                        trace!("Skipping type-only re-export of '{}'", source.value);
                    } else {
                        self.push(source, SpecKind::Static);
                    }
                }
                match &decl.declaration {
                    Some(Declaration::VariableDeclaration(vd)) => self.variable_declaration(vd),
                    Some(Declaration::ClassDeclaration(class)) => self.class(class),
                    _ => {}
                }
            }
            Statement::ExportAllDeclaration(decl) => {
                if decl.export_kind.is_type() {
                    trace!("Skipping type-only re-export of '{}'", decl.source.value);
                } else {
                    self.push(&decl.source, SpecKind::Static);
                }
            }
            Statement::ExportDefaultDeclaration(decl) => match &decl.declaration {
                ExportDefaultDeclarationKind::ClassDeclaration(class) => self.class(class),
                kind => {
                    if let Some(expr) = kind.as_expression() {
                        self.expression(expr);
                    }
                }
            },
            Statement::ExpressionStatement(es) => self.expression(&es.expression),
            Statement::VariableDeclaration(vd) => self.variable_declaration(vd),
            Statement::ClassDeclaration(class) => self.class(class),
            // Control flow at module level still runs during evaluation
            Statement::BlockStatement(bs) => self.statements(&bs.body),
            Statement::TryStatement(ts) => {
                self.statements(&ts.block.body);
                if let Some(handler) = &ts.handler {
                    self.statements(&handler.body.body);
                }
                if let Some(finalizer) = &ts.finalizer {
                    self.statements(&finalizer.body);
                }
            }
            Statement::IfStatement(is) => {
                self.expression(&is.test);
                self.statement(&is.consequent);
                if let Some(alternate) = &is.alternate {
                    self.statement(alternate);
                }
            }
            Statement::ForStatement(fs) => {
                match &fs.init {
                    Some(ForStatementInit::VariableDeclaration(vd)) => self.variable_declaration(vd),
                    Some(init) => {
                        if let Some(expr) = init.as_expression() {
                            self.expression(expr);
                        }
                    }
                    None => {}
                }
                if let Some(test) = &fs.test {
                    self.expression(test);
                }
                if let Some(update) = &fs.update {
                    self.expression(update);
                }
                self.statement(&fs.body);
            }
            Statement::ForInStatement(fs) => {
                self.expression(&fs.right);
                self.statement(&fs.body);
            }
            Statement::ForOfStatement(fs) => {
                self.expression(&fs.right);
                self.statement(&fs.body);
            }
            Statement::WhileStatement(ws) => {
                self.expression(&ws.test);
                self.statement(&ws.body);
            }
            Statement::DoWhileStatement(ds) => {
                self.statement(&ds.body);
                self.expression(&ds.test);
            }
            Statement::SwitchStatement(ss) => {
                self.expression(&ss.discriminant);
                for case in &ss.cases {
                    if let Some(test) = &case.test {
                        self.expression(test);
                    }
                    self.statements(&case.consequent);
                }
            }
            Statement::LabeledStatement(ls) => self.statement(&ls.body),
            Statement::ThrowStatement(ts) => self.expression(&ts.argument),
            _ => {}
        }
    }

    fn statements(&mut self, body: &[Statement]) {
        for stmt in body {
            self.statement(stmt);
        }
    }

    /// Class evaluation runs `extends`, computed keys, static initializers and
    /// static blocks. Methods and instance fields run later.
    fn class(&mut self, class: &Class) {
        if let Some(super_class) = &class.super_class {
            self.expression(super_class);
        }
        for element in &class.body.body {
            match element {
                ClassElement::StaticBlock(sb) => self.statements(&sb.body),
                ClassElement::PropertyDefinition(pd) => {
                    self.property_key(&pd.key);
                    if pd.r#static
                        && let Some(value) = &pd.value
                    {
                        self.expression(value);
                    }
                }
                ClassElement::AccessorProperty(ap) => {
                    self.property_key(&ap.key);
                    if ap.r#static
                        && let Some(value) = &ap.value
                    {
                        self.expression(value);
                    }
                }
                ClassElement::MethodDefinition(md) => self.property_key(&md.key),
                ClassElement::TSIndexSignature(_) => {}
            }
        }
    }

    fn property_key(&mut self, key: &PropertyKey) {
        if let Some(expr) = key.as_expression() {
            self.expression(expr);
        }
    }

    fn variable_declaration(&mut self, vd: &VariableDeclaration) {
        for decl in &vd.declarations {
            if let Some(init) = &decl.init {
                self.expression(init);
            }
        }
    }

    /// Walks the parts of an expression that are evaluated immediately.
    /// Function bodies are not entered: a `require` there runs lazily.
    fn expression(&mut self, expr: &Expression) {
        match expr {
            Expression::CallExpression(ce) => {
                if let Expression::Identifier(callee) = &ce.callee
                    && callee.name.as_str() == "require"
                    && let Some(Expression::StringLiteral(sl)) =
                        ce.arguments.first().and_then(|a| a.as_expression())
                {
                    self.push(sl, SpecKind::Require);
                }
                self.arguments(&ce.arguments);
                self.expression(&ce.callee);
            }
            Expression::NewExpression(ne) => {
                self.arguments(&ne.arguments);
                self.expression(&ne.callee);
            }
            Expression::ImportExpression(ie) => {
                if let Expression::StringLiteral(sl) = &ie.source {
                    self.push(sl, SpecKind::Dynamic);
                }
            }
            Expression::ArrayExpression(ae) => {
                for elem in &ae.elements {
                    if let Some(e) = elem.as_expression() {
                        self.expression(e);
                    }
                }
            }
            Expression::ObjectExpression(oe) => {
                for prop in &oe.properties {
                    match prop {
                        ObjectPropertyKind::ObjectProperty(p) => {
                            self.property_key(&p.key);
                            self.expression(&p.value);
                        }
                        ObjectPropertyKind::SpreadProperty(s) => self.expression(&s.argument),
                    }
                }
            }
            Expression::ConditionalExpression(ce) => {
                self.expression(&ce.test);
                self.expression(&ce.consequent);
                self.expression(&ce.alternate);
            }
            Expression::LogicalExpression(le) => {
                self.expression(&le.left);
                self.expression(&le.right);
            }
            Expression::BinaryExpression(be) => {
                self.expression(&be.left);
                self.expression(&be.right);
            }
            Expression::UnaryExpression(ue) => self.expression(&ue.argument),
            Expression::TemplateLiteral(tl) => self.template(tl),
            Expression::TaggedTemplateExpression(te) => {
                self.expression(&te.tag);
                self.template(&te.quasi);
            }
            Expression::ClassExpression(class) => self.class(class),
            Expression::ChainExpression(ce) => match &ce.expression {
                ChainElement::CallExpression(call) => {
                    self.arguments(&call.arguments);
                    self.expression(&call.callee);
                }
                ChainElement::TSNonNullExpression(te) => self.expression(&te.expression),
                member => {
                    if let Some(me) = member.as_member_expression() {
                        self.expression(me.object());
                    }
                }
            },
            Expression::SequenceExpression(se) => {
                for e in &se.expressions {
                    self.expression(e);
                }
            }
            Expression::AssignmentExpression(ae) => self.expression(&ae.right),
            Expression::ParenthesizedExpression(pe) => self.expression(&pe.expression),
            Expression::AwaitExpression(ae) => self.expression(&ae.argument),
            Expression::StaticMemberExpression(me) => self.expression(&me.object),
            Expression::ComputedMemberExpression(me) => self.expression(&me.object),
            Expression::TSAsExpression(te) => self.expression(&te.expression),
            Expression::TSNonNullExpression(te) => self.expression(&te.expression),
            Expression::TSSatisfiesExpression(te) => self.expression(&te.expression),
            Expression::TSTypeAssertion(te) => self.expression(&te.expression),
            _ => {}
        }
    }

    fn arguments(&mut self, arguments: &[Argument]) {
        for arg in arguments {
            if let Some(arg_expr) = arg.as_expression() {
                self.expression(arg_expr);
            }
        }
    }

    fn template(&mut self, template: &TemplateLiteral) {
        for expr in &template.expressions {
            self.expression(expr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let file_path = dir.join(name);
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn requests(imports: &[ImportNode]) -> Vec<&str> {
        imports.iter().map(|n| n.request.as_str()).collect()
    }

    fn extract(name: &str, src: &str) -> Vec<ImportNode> {
        extract_imports(Path::new(name), src).unwrap()
    }

    #[test]
    fn test_static_import_default() {
        let imports = extract("test.js", "import foo from './foo';");
        assert_eq!(requests(&imports), vec!["./foo"]);
        assert_eq!(imports[0].kind, SpecKind::Static);
    }

    #[test]
    fn test_side_effect_import() {
        let imports = extract("test.ts", "import 'lodash';");
        assert_eq!(requests(&imports), vec!["lodash"]);
        assert_eq!(imports[0].kind, SpecKind::Static);
    }

    #[test]
    fn test_dynamic_import_kind() {
        let imports = extract("test.js", "const mod = await import('./lazy');");
        assert_eq!(requests(&imports), vec!["./lazy"]);
        assert_eq!(imports[0].kind, SpecKind::Dynamic);
        assert!(!imports[0].kind.is_eager());
    }

    #[test]
    fn test_dynamic_import_then_chain() {
        let imports = extract("test.js", "import('chart.js').then((m) => m.default);");
        assert_eq!(requests(&imports), vec!["chart.js"]);
        assert_eq!(imports[0].kind, SpecKind::Dynamic);
    }

    #[test]
    fn test_require_call() {
        let imports = extract("test.cjs", "const fs = require('fs');");
        assert_eq!(requests(&imports), vec!["fs"]);
        assert_eq!(imports[0].kind, SpecKind::Require);
    }

    #[test]
    fn test_require_member_access() {
        let imports = extract("test.cjs", "const get = require('lodash').get;");
        assert_eq!(requests(&imports), vec!["lodash"]);
    }

    #[test]
    fn test_require_inside_function_is_lazy() {
        let imports = extract("test.js", "function load() { return require('heavy'); }");
        assert!(imports.is_empty());
    }

    #[test]
    fn test_nested_requires_in_source_order() {
        let imports = extract("test.js", "const c = wrap(require('./a'), [require('./b')]);");
        assert_eq!(requests(&imports), vec!["./a", "./b"]);
    }

    #[test]
    fn test_require_in_object_and_conditional() {
        let imports = extract(
            "test.js",
            "const cfg = { db: require('./db') };\nconst m = flag ? require('./x') : require('./y');",
        );
        assert_eq!(requests(&imports), vec!["./db", "./x", "./y"]);
    }

    #[test]
    fn test_require_in_try_catch_finally() {
        let imports = extract(
            "test.cjs",
            "try { require('lodash'); } catch (e) { require('./fallback'); } finally { require('./done'); }",
        );
        assert_eq!(requests(&imports), vec!["lodash", "./fallback", "./done"]);
        assert!(imports.iter().all(|n| n.kind == SpecKind::Require));
    }

    #[test]
    fn test_require_in_if_and_plain_block() {
        let imports = extract(
            "test.cjs",
            "if (process.env.X) { require('lodash'); } else require('./other');
{ const a = require('axios'); }",
        );
        assert_eq!(requests(&imports), vec!["lodash", "./other", "axios"]);
    }

    #[test]
    fn test_require_in_loops_switch_and_label() {
        let imports = extract(
            "test.cjs",
            "for (const p of [require('./a')]) { require('./b'); }
             while (!loaded) { require('./c'); }
             switch (mode) { case 'x': require('./d'); break; default: require('./e'); }
             outer: for (;;) { require('./f'); break outer; }",
        );
        assert_eq!(requests(&imports), vec!["./a", "./b", "./c", "./d", "./e", "./f"]);
    }

    #[test]
    fn test_require_in_new_unary_binary_template() {
        let imports = extract(
            "test.cjs",
            "const x = new Wrapper(require('a'));
             const u = !require('b');
             const s = require('c') + require('d');
             const t = `${require('e')}`;
             const g = tag`${require('f')}`;",
        );
        assert_eq!(requests(&imports), vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_require_in_optional_chain_and_satisfies() {
        let imports = extract(
            "test.ts",
            "const v = require('a')?.version;
const c = require('b') satisfies unknown;",
        );
        assert_eq!(requests(&imports), vec!["a", "b"]);
    }

    #[test]
    fn test_class_static_members_are_eager() {
        let imports = extract(
            "test.js",
            "class A extends require('./base') {
               static lib = require('lodash');
               static { require('./init'); }
               field = require('lazy-field');
               method() { return require('lazy-method'); }
             }",
        );
        assert_eq!(requests(&imports), vec!["./base", "lodash", "./init"]);
    }

    #[test]
    fn test_functions_inside_blocks_stay_lazy() {
        let imports = extract(
            "test.cjs",
            "if (ok) { function f() { require('a'); } const g = () => require('b'); }
             try { setup(function () { require('c'); }); } catch {}",
        );
        assert!(imports.is_empty());
    }

    #[test]
    fn test_type_only_import_skipped() {
        let imports = extract("test.ts", "import type { Foo } from './types';");
        assert!(imports.is_empty());
    }

    #[test]
    fn test_all_inline_type_specifiers_skipped() {
        let imports = extract("test.ts", "import { type Foo, type Bar } from 'zod';");
        assert!(imports.is_empty());
    }

    #[test]
    fn test_mixed_type_and_runtime_import() {
        let imports = extract("test.ts", "import { type Foo, bar } from './utils';");
        assert_eq!(requests(&imports), vec!["./utils"]);
    }

    #[test]
    fn test_reexports() {
        let imports = extract(
            "test.ts",
            "export * from './all';\nexport { a } from 'pkg';\nexport type { T } from './types';",
        );
        assert_eq!(requests(&imports), vec!["./all", "pkg"]);
        assert!(imports.iter().all(|n| n.kind == SpecKind::Static));
    }

    #[test]
    fn test_exported_and_default_require() {
        let imports =
            extract("test.js", "export const a = require('./a');\nexport default require('b');");
        assert_eq!(requests(&imports), vec!["./a", "b"]);
    }

    #[test]
    fn test_location_is_one_based() {
        let imports = extract("test.ts", "const x = 1;\nimport a from 'axios';");
        let loc = imports[0].location;
        assert_eq!(loc.line, 2);
        // the literal including its opening quote starts after `import a from `
        assert_eq!(loc.column, 15);
        assert!(loc.end > loc.start);
    }

    #[test]
    fn test_syntax_error_is_parse_failure() {
        let err = extract_imports(Path::new("broken.ts"), "import { from 'x'").unwrap_err();
        assert!(matches!(err, ExtractError::Parse { .. }));
        assert_eq!(err.path(), &PathBuf::from("broken.ts"));
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DashMap::new();
        let err = imports_for(&temp_dir.path().join("nope.ts"), &cache).unwrap_err();
        assert!(matches!(err, ExtractError::Read { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_non_utf8_file_is_read_failure() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DashMap::new();
        let file = temp_dir.path().join("bin.ts");
        fs::write(&file, [0xff, 0xfe, 0x00, 0xc3, 0x28]).unwrap();

        let err = imports_for(&file, &cache).unwrap_err();
        assert!(matches!(err, ExtractError::Read { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_jsx_file() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DashMap::new();
        let file = create_test_file(
            temp_dir.path(),
            "test.jsx",
            "import React from 'react';\nexport const A = () => <div />;",
        );
        let imports = imports_for(&file, &cache).unwrap();
        assert_eq!(requests(&imports), vec!["react"]);
    }

    #[test]
    fn test_cache_behavior() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DashMap::new();
        let file = create_test_file(temp_dir.path(), "test.js", "import foo from './foo';");

        let first = imports_for(&file, &cache).unwrap();
        fs::write(&file, "// rewritten").unwrap();
        let second = imports_for(&file, &cache).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }
}
