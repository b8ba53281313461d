//! Module provenance - import categorization for Python references
//!
//! Every imported module resolves to exactly one category: part of the
//! standard library, installed in the host environment, or local to the
//! project under analysis. Relative syntax always wins, then builtin-name
//! membership, then installed-package presence, with Local as the total
//! fallback.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Provenance classification of an imported module
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModuleCategory {
    Native,
    ThirdParty,
    Local,
}

impl std::fmt::Display for ModuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleCategory::Native => write!(f, "native"),
            ModuleCategory::ThirdParty => write!(f, "third_party"),
            ModuleCategory::Local => write!(f, "local"),
        }
    }
}

/// Boolean predicate over the host environment's package index.
///
/// Environment-dependent by design: the same source categorizes differently
/// in different environments. Implementations must fail closed (return
/// `false` on any probe error) so the categorizer falls back to `Local`.
pub trait PackageProbe: Send + Sync {
    fn is_installed(&self, name: &str) -> bool;
}

/// Classify a module reference as native, third-party or local.
///
/// The order matters: a relative reference (leading `.`) is `Local` no
/// matter what the builtin table or package index would say.
pub fn categorize(reference: &str, probe: &dyn PackageProbe) -> ModuleCategory {
    if reference.starts_with('.') {
        return ModuleCategory::Local;
    }

    let root = &reference[..reference.find('.').unwrap_or(reference.len())];

    if BUILTIN_MODULES.binary_search(&root).is_ok() {
        return ModuleCategory::Native;
    }
    if probe.is_installed(root) {
        return ModuleCategory::ThirdParty;
    }

    ModuleCategory::Local
}

/// Shared environment probe so memoized lookups are reused across files
static ENV_PROBE: Lazy<Arc<SitePackagesProbe>> =
    Lazy::new(|| Arc::new(SitePackagesProbe::from_env()));

pub fn env_probe() -> Arc<SitePackagesProbe> {
    Arc::clone(&ENV_PROBE)
}

/// Package probe over the host environment's site-packages directories.
///
/// Matches top-level modules, packages and `*.dist-info`/`*.egg-info`
/// distribution folders with PEP 503-style name normalization. Lookups are
/// memoized per distinct module reference for the life of the probe.
pub struct SitePackagesProbe {
    roots: Vec<PathBuf>,
    cache: Mutex<HashMap<String, bool>>,
}

/// `{name}-{version}.dist-info` / `.egg-info` directory names
static DIST_INFO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)-[0-9][^-]*\.(?:dist-info|egg-info)$").unwrap());

impl SitePackagesProbe {
    /// Discover probe roots from the ambient Python environment
    pub fn from_env() -> Self {
        let mut roots: Vec<PathBuf> = Vec::new();

        for var in ["VIRTUAL_ENV", "CONDA_PREFIX"] {
            if let Ok(prefix) = std::env::var(var) {
                let pattern = format!("{prefix}/lib/python*/site-packages");
                if let Ok(paths) = glob::glob(&pattern) {
                    roots.extend(paths.flatten());
                }
            }
        }
        if let Some(path_var) = std::env::var_os("PYTHONPATH") {
            roots.extend(std::env::split_paths(&path_var));
        }
        roots.retain(|p| p.is_dir());

        debug!("Package probe roots: {roots:?}");
        Self::with_roots(roots)
    }

    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn probe(&self, name: &str) -> bool {
        let normalized = normalize_distribution_name(name);

        for root in &self.roots {
            if root.join(name).is_dir() || root.join(format!("{name}.py")).is_file() {
                return true;
            }

            // Unreadable roots count as "not found", never as an error
            let entries = match std::fs::read_dir(root) {
                Ok(entries) => entries,
                Err(_) => continue,
            };
            for entry in entries.flatten() {
                let file_name = entry.file_name();
                let Some(file_name) = file_name.to_str() else {
                    continue;
                };
                if let Some(caps) = DIST_INFO.captures(file_name) {
                    if normalize_distribution_name(&caps[1]) == normalized {
                        return true;
                    }
                }
            }
        }

        false
    }
}

impl PackageProbe for SitePackagesProbe {
    fn is_installed(&self, name: &str) -> bool {
        if let Ok(cache) = self.cache.lock() {
            if let Some(hit) = cache.get(name) {
                return *hit;
            }
        }

        let found = self.probe(name);
        debug!("Probed package {name}: installed={found}");

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(name.to_string(), found);
        }
        found
    }
}

/// PEP 503 normalization: lowercase, runs of `-`, `_` and `.` collapse to `-`
fn normalize_distribution_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_sep = false;
    for ch in name.chars() {
        if matches!(ch, '-' | '_' | '.') {
            if !prev_sep {
                out.push('-');
            }
            prev_sep = true;
        } else {
            out.extend(ch.to_lowercase());
            prev_sep = false;
        }
    }
    out
}

/// Python standard library module names.
///
/// Kept lexicographically sorted: `categorize` binary-searches this table,
/// so an unsorted entry silently breaks membership tests (guarded by the
/// sortedness test below).
pub static BUILTIN_MODULES: &[&str] = &[
    "__future__",
    "abc",
    "aifc",
    "argparse",
    "array",
    "ast",
    "asyncio",
    "atexit",
    "audioop",
    "base64",
    "bdb",
    "binascii",
    "bisect",
    "builtins",
    "bz2",
    "cProfile",
    "calendar",
    "cgi",
    "cgitb",
    "chunk",
    "cmath",
    "cmd",
    "code",
    "codecs",
    "codeop",
    "collections",
    "colorsys",
    "compileall",
    "concurrent",
    "configparser",
    "contextlib",
    "contextvars",
    "copy",
    "copyreg",
    "crypt",
    "csv",
    "ctypes",
    "curses",
    "dataclasses",
    "datetime",
    "dbm",
    "decimal",
    "difflib",
    "dis",
    "doctest",
    "email",
    "encodings",
    "ensurepip",
    "enum",
    "errno",
    "faulthandler",
    "fcntl",
    "filecmp",
    "fileinput",
    "fnmatch",
    "fractions",
    "ftplib",
    "functools",
    "gc",
    "getopt",
    "getpass",
    "gettext",
    "glob",
    "graphlib",
    "grp",
    "gzip",
    "hashlib",
    "heapq",
    "hmac",
    "html",
    "http",
    "idlelib",
    "imaplib",
    "imghdr",
    "importlib",
    "inspect",
    "io",
    "ipaddress",
    "itertools",
    "json",
    "keyword",
    "lib2to3",
    "linecache",
    "locale",
    "logging",
    "lzma",
    "mailbox",
    "mailcap",
    "marshal",
    "math",
    "mimetypes",
    "mmap",
    "modulefinder",
    "msilib",
    "msvcrt",
    "multiprocessing",
    "netrc",
    "nis",
    "nntplib",
    "ntpath",
    "nturl2path",
    "numbers",
    "opcode",
    "operator",
    "optparse",
    "os",
    "ossaudiodev",
    "pathlib",
    "pdb",
    "pickle",
    "pickletools",
    "pipes",
    "pkgutil",
    "platform",
    "plistlib",
    "poplib",
    "posix",
    "posixpath",
    "pprint",
    "profile",
    "pstats",
    "pty",
    "pwd",
    "py_compile",
    "pyclbr",
    "pydoc",
    "queue",
    "quopri",
    "random",
    "re",
    "readline",
    "reprlib",
    "resource",
    "rlcompleter",
    "runpy",
    "sched",
    "secrets",
    "select",
    "selectors",
    "shelve",
    "shlex",
    "shutil",
    "signal",
    "site",
    "smtplib",
    "sndhdr",
    "socket",
    "socketserver",
    "spwd",
    "sqlite3",
    "sre_compile",
    "sre_constants",
    "sre_parse",
    "ssl",
    "stat",
    "statistics",
    "string",
    "stringprep",
    "struct",
    "subprocess",
    "sunau",
    "symtable",
    "sys",
    "sysconfig",
    "syslog",
    "tabnanny",
    "tarfile",
    "telnetlib",
    "tempfile",
    "termios",
    "test",
    "textwrap",
    "threading",
    "time",
    "timeit",
    "tkinter",
    "token",
    "tokenize",
    "tomllib",
    "trace",
    "traceback",
    "tracemalloc",
    "tty",
    "turtle",
    "turtledemo",
    "types",
    "typing",
    "unicodedata",
    "unittest",
    "urllib",
    "uu",
    "uuid",
    "venv",
    "warnings",
    "wave",
    "weakref",
    "webbrowser",
    "winreg",
    "winsound",
    "wsgiref",
    "xdrlib",
    "xml",
    "xmlrpc",
    "zipapp",
    "zipfile",
    "zipimport",
    "zlib",
    "zoneinfo",
];
