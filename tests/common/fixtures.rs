//! Test fixtures - reusable content constants for tests.

/// Manifest declaring `lib/` plus a `main` entry outside it
pub const MANIFEST_WITH_FILES: &str = r#"{
  "name": "demo-app",
  "version": "1.0.0",
  "main": "server.js",
  "files": ["lib"]
}
"#;

/// Manifest without a `files` list (everything not ignored is published)
pub const MANIFEST_WITHOUT_FILES: &str = r#"{
  "name": "demo-app",
  "version": "1.0.0"
}
"#;

pub const SERVER_JS: &str = "require('./lib/routes');\n";

pub const ROUTES_JS: &str = "module.exports = [];\n";

/// Installer script: one dependency with tests, docs and a nested module
pub const INSTALL_SCRIPT: &str = "mkdir -p node_modules/express/lib/router node_modules/express/test \
&& printf 'module.exports = 1;' > node_modules/express/index.js \
&& printf '{}' > node_modules/express/package.json \
&& printf '# express' > node_modules/express/README.md \
&& printf '' > node_modules/express/lib/router/index.js \
&& printf '' > node_modules/express/test/app.js";
