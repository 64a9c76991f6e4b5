//! Built-in file type table
//!
//! Order matters: resolution scans the table front to back and the first
//! matching definition wins.

use super::types::{Category, FileTypeDefinition};

const fn def(
    syntax: &'static str,
    label: &'static str,
    mime: &'static str,
    extensions: &'static [&'static str],
    category: Category,
) -> FileTypeDefinition {
    FileTypeDefinition {
        syntax,
        label,
        mime,
        extensions,
        category,
    }
}

/// Sentinel returned when nothing in the table matches
pub static UNKNOWN: FileTypeDefinition = def(
    "auto",
    "Unknown",
    "application/octet-stream",
    &[],
    Category::Unknown,
);

/// The built-in table of known file types
#[rustfmt::skip]
pub static FILE_TYPES: &[FileTypeDefinition] = &[
    // General Purpose Programming Languages
    def("javascript", "JavaScript", "application/javascript", &["js", "jsx", "mjs", "cjs"], Category::Code),
    def("typescript", "TypeScript", "application/x-typescript", &["ts", "tsx"], Category::Code),
    def("python", "Python", "text/x-python", &["py", "pyw", "pyx", "pyi", "pyd", "pyc"], Category::Code),
    def("java", "Java", "text/x-java-source", &["java", "class", "jar"], Category::Code),
    def("csharp", "C#", "text/x-csharp", &["cs", "csx"], Category::Code),
    def("cpp", "C++", "text/x-c++", &["cpp", "cc", "cxx", "c++", "hpp", "hh", "hxx", "h++"], Category::Code),
    def("c", "C", "text/x-c", &["c", "h"], Category::Code),
    def("objective-c", "Objective-C", "text/x-objectivec", &["m", "mm"], Category::Code),
    def("swift", "Swift", "text/x-swift", &["swift"], Category::Code),
    def("kotlin", "Kotlin", "text/x-kotlin", &["kt", "kts", "ktm"], Category::Code),

    // Systems Programming Languages
    def("rust", "Rust", "text/x-rust", &["rs"], Category::Code),
    def("go", "Go", "text/x-go", &["go"], Category::Code),
    def("zig", "Zig", "text/x-zig", &["zig"], Category::Code),
    def("d", "D", "text/x-d", &["d", "di"], Category::Code),
    def("nim", "Nim", "text/x-nim", &["nim", "nims", "nimble"], Category::Code),
    def("v", "V", "text/x-v", &["v", "vsh"], Category::Code),

    // Functional Programming Languages
    def("haskell", "Haskell", "text/x-haskell", &["hs", "lhs"], Category::Code),
    def("ocaml", "OCaml", "text/x-ocaml", &["ml", "mli", "mll", "mly"], Category::Code),
    def("fsharp", "F#", "text/x-fsharp", &["fs", "fsi", "fsx", "fsscript"], Category::Code),
    def("scala", "Scala", "text/x-scala", &["scala", "sc"], Category::Code),
    def("clojure", "Clojure", "text/x-clojure", &["clj", "cljs", "cljc", "edn"], Category::Code),
    def("elixir", "Elixir", "text/x-elixir", &["ex", "exs"], Category::Code),
    def("erlang", "Erlang", "text/x-erlang", &["erl", "hrl"], Category::Code),
    def("scheme", "Scheme", "text/x-scheme", &["scm", "ss", "sld"], Category::Code),
    def("racket", "Racket", "text/x-racket", &["rkt", "rktl", "rktd"], Category::Code),
    def("lisp", "Lisp", "text/x-lisp", &["lisp", "lsp", "l", "cl", "fasl"], Category::Code),

    // Web Development
    def("html", "HTML", "text/html", &["html", "htm", "xhtml"], Category::Html),
    def("css", "CSS", "text/css", &["css"], Category::Code),
    def("scss", "SCSS", "text/x-scss", &["scss"], Category::Code),
    def("sass", "Sass", "text/x-sass", &["sass"], Category::Code),
    def("less", "Less", "text/x-less", &["less"], Category::Code),
    def("php", "PHP", "application/x-php", &["php", "phtml", "php3", "php4", "php5", "phps"], Category::Code),
    def("ruby", "Ruby", "application/x-ruby", &["rb", "rbw", "rake", "gemspec"], Category::Code),
    def("vue", "Vue", "text/x-vue", &["vue"], Category::Code),
    def("svelte", "Svelte", "text/x-svelte", &["svelte"], Category::Code),
    def("jsx", "JSX", "text/jsx", &["jsx"], Category::Code),

    // Scripting Languages
    def("bash", "Bash", "text/x-shellscript", &["sh", "bash"], Category::Code),
    def("shell", "Shell", "application/x-sh", &["zsh", "fish", "ksh", "csh", "tcsh"], Category::Code),
    def("powershell", "PowerShell", "application/x-powershell", &["ps1", "psm1", "psd1"], Category::Code),
    def("perl", "Perl", "text/x-perl", &["pl", "pm", "perl"], Category::Code),
    def("lua", "Lua", "text/x-lua", &["lua"], Category::Code),
    def("tcl", "Tcl", "text/x-tcl", &["tcl"], Category::Code),
    def("awk", "AWK", "text/x-awk", &["awk"], Category::Code),
    def("sed", "Sed", "text/x-sed", &["sed"], Category::Code),

    // Data & Configuration
    def("json", "JSON", "application/json", &["json", "jsonc", "json5"], Category::Code),
    def("yaml", "YAML", "application/x-yaml", &["yaml", "yml"], Category::Code),
    def("xml", "XML", "application/xml", &["xml", "xsl", "xslt", "xsd", "dtd"], Category::Code),
    def("toml", "TOML", "application/toml", &["toml"], Category::Code),
    def("ini", "INI", "text/x-ini", &["ini", "cfg", "conf", "config"], Category::Code),
    def("properties", "Properties", "text/x-properties", &["properties"], Category::Code),
    def("csv", "CSV", "text/csv", &["csv"], Category::Csv),
    def("tsv", "TSV", "text/tab-separated-values", &["tsv"], Category::Csv),
    def("env", "Environment", "application/x-env", &["env"], Category::Code),

    // Markup & Documentation
    def("markdown", "Markdown", "text/markdown", &["md", "markdown", "mdown", "mkd"], Category::Markdown),
    def("restructuredtext", "reStructuredText", "text/x-rst", &["rst", "rest"], Category::Markdown),
    def("asciidoc", "AsciiDoc", "text/x-asciidoc", &["adoc", "asciidoc", "asc"], Category::Markdown),
    def("org", "Org Mode", "text/x-org", &["org"], Category::Markdown),
    def("latex", "LaTeX", "text/x-latex", &["tex", "latex", "sty", "cls"], Category::Code),
    def("bibtex", "BibTeX", "text/x-bibtex", &["bib", "bibtex"], Category::Code),

    // Query Languages
    def("sql", "SQL", "application/sql", &["sql", "ddl", "dml"], Category::Code),
    def("mysql", "MySQL", "text/x-mysql", &["mysql"], Category::Code),
    def("pgsql", "PostgreSQL", "text/x-pgsql", &["pgsql", "postgres"], Category::Code),
    def("plsql", "PL/SQL", "text/x-plsql", &["plsql", "pls"], Category::Code),
    def("graphql", "GraphQL", "application/graphql", &["graphql", "gql"], Category::Code),
    def("sparql", "SPARQL", "application/sparql-query", &["sparql", "rq"], Category::Code),

    // Template Languages
    def("handlebars", "Handlebars", "text/x-handlebars-template", &["hbs", "handlebars"], Category::Code),
    def("mustache", "Mustache", "text/x-mustache", &["mustache"], Category::Code),
    def("jinja", "Jinja", "text/x-jinja", &["jinja", "jinja2", "j2"], Category::Code),
    def("ejs", "EJS", "text/x-ejs", &["ejs"], Category::Code),
    def("pug", "Pug", "text/x-pug", &["pug", "jade"], Category::Code),
    def("twig", "Twig", "text/x-twig", &["twig"], Category::Code),
    def("liquid", "Liquid", "text/x-liquid", &["liquid"], Category::Code),
    def("razor", "Razor", "text/x-cshtml", &["cshtml", "razor"], Category::Code),

    // Domain-Specific Languages
    def("dockerfile", "Dockerfile", "text/x-dockerfile", &["dockerfile"], Category::Code),
    def("makefile", "Makefile", "text/x-makefile", &["makefile", "mk", "mak"], Category::Code),
    def("cmake", "CMake", "text/x-cmake", &["cmake", "cmake.in"], Category::Code),
    def("gradle", "Gradle", "text/x-gradle", &["gradle"], Category::Code),
    def("groovy", "Groovy", "text/x-groovy", &["groovy", "gvy", "gy", "gsh"], Category::Code),
    def("terraform", "Terraform", "text/x-terraform", &["tf", "tfvars", "hcl"], Category::Code),
    def("nginx", "Nginx", "text/x-nginx-conf", &["nginx", "nginxconf"], Category::Code),
    def("apache", "Apache", "text/x-apache-conf", &["htaccess", "apache", "apacheconf"], Category::Code),
    def("protobuf", "Protocol Buffers", "text/x-protobuf", &["proto"], Category::Code),
    def("thrift", "Thrift", "text/x-thrift", &["thrift"], Category::Code),

    // Scientific & Mathematical
    def("r", "R", "text/x-r", &["r", "R"], Category::Code),
    def("julia", "Julia", "text/x-julia", &["jl"], Category::Code),
    def("matlab", "MATLAB", "text/x-matlab", &["mat"], Category::Code),
    def("octave", "Octave", "text/x-octave", &[], Category::Code),
    def("mathematica", "Mathematica", "text/x-mathematica", &["nb", "wl", "wls"], Category::Code),
    def("sage", "Sage", "text/x-sage", &["sage"], Category::Code),
    def("fortran", "Fortran", "text/x-fortran", &["f", "for", "f90", "f95", "f03", "f08"], Category::Code),

    // Assembly & Low-Level
    def("asm", "Assembly", "text/x-asm", &["asm", "s", "nasm"], Category::Code),
    def("llvm", "LLVM IR", "text/x-llvm", &["ll"], Category::Code),
    def("wasm", "WebAssembly", "application/wasm", &["wasm", "wat"], Category::Code),

    // Mobile Development
    def("dart", "Dart", "text/x-dart", &["dart"], Category::Code),

    // Game Development
    def("gdscript", "GDScript", "text/x-gdscript", &["gd"], Category::Code),
    def("hlsl", "HLSL", "text/x-hlsl", &["hlsl", "fx", "fxh"], Category::Code),
    def("glsl", "GLSL", "text/x-glsl", &["glsl", "vert", "frag", "geom", "comp", "tesc", "tese"], Category::Code),
    def("wgsl", "WGSL", "text/x-wgsl", &["wgsl"], Category::Code),

    // Hardware Description Languages
    def("verilog", "Verilog", "text/x-verilog", &["sv", "svh"], Category::Code),
    def("vhdl", "VHDL", "text/x-vhdl", &["vhd", "vhdl"], Category::Code),

    // Legacy & Specialized Languages
    def("cobol", "COBOL", "text/x-cobol", &["cob", "cbl", "cobol"], Category::Code),
    def("pascal", "Pascal", "text/x-pascal", &["pas", "p", "pp"], Category::Code),
    def("delphi", "Delphi", "text/x-delphi", &["dpr", "dfm"], Category::Code),
    def("basic", "BASIC", "text/x-basic", &["bas"], Category::Code),
    def("vb", "Visual Basic", "text/x-vb", &["vb", "vbs"], Category::Code),

    // Blockchain & Smart Contracts
    def("solidity", "Solidity", "text/x-solidity", &["sol"], Category::Code),
    def("cairo", "Cairo", "text/x-cairo", &["cairo"], Category::Code),
    def("move", "Move", "text/x-move", &["move"], Category::Code),

    // Special File Types
    def("diff", "Diff", "text/x-diff", &["diff", "patch"], Category::Code),
    def("git", "Git Config", "text/x-git", &["gitignore", "gitattributes", "gitmodules"], Category::Code),
    def("excalidraw", "Excalidraw", "application/vnd.excalidraw+json", &["excalidraw"], Category::Excalidraw),
    def("svg", "SVG", "image/svg+xml", &["svg"], Category::Image),

    // Binary & Archive Formats
    def("pdf", "PDF", "application/pdf", &["pdf"], Category::Pdf),
    def("image", "Image", "image/", &["jpg", "jpeg", "png", "gif", "webp", "bmp", "ico", "tiff", "tif"], Category::Image),
    def("archive", "Archive", "application/zip", &["zip", "tar", "gz", "bz2", "xz", "7z", "rar", "tgz", "tbz2", "txz", "tar.gz", "tar.bz2", "tar.xz"], Category::Archive),

    // Plain Text (Fallback)
    def("text", "Text", "text/plain", &["txt", "text", "log"], Category::Text),
];
