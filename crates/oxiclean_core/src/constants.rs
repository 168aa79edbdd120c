//! File extension tables and the Node.js built-in module list.
//!
//! Extensions are ordered by resolution priority: TypeScript sources win over
//! JavaScript ones so that `import './foo'` next to both `foo.ts` and a compiled
//! `foo.js` lands on the source file.

/// File extensions for JavaScript/TypeScript files that should be analyzed
pub const JS_TS_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Extensions to try when resolving module imports (in priority order)
pub const RESOLVE_EXTENSIONS: &[&str] = JS_TS_EXTENSIONS;

/// Index file names to try when resolving directory imports
pub const INDEX_FILES: &[&str] = &[
    "index.ts",
    "index.tsx",
    "index.mts",
    "index.cts",
    "index.js",
    "index.jsx",
    "index.mjs",
    "index.cjs",
];

/// TypeScript sources that stand behind a JavaScript-style extension.
///
/// TS projects commonly write `import './util.js'` for a file on disk named `util.ts`.
pub const JS_TO_TS_EXTENSIONS: &[(&str, &[&str])] =
    &[("js", &["ts", "tsx"]), ("jsx", &["tsx"]), ("mjs", &["mts"]), ("cjs", &["cts"])];

/// Prefix that always denotes a Node.js built-in (`node:fs`, `node:test`, ...)
pub const NODE_BUILTIN_PREFIX: &str = "node:";

/// Node.js built-in modules importable without the `node:` prefix.
///
/// Only the sub-paths listed here are built-in; `punycode/` or `fs/other` are packages.
pub const NODE_BUILTINS: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "inspector/promises",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];
