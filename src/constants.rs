//! Common constants used throughout the Catalyst WP application.

/// Marker file whose presence identifies a Catalyst WP project root
pub const MARKER_FILE: &str = "catalyst-wp.json";

/// Boilerplate WordPress codebase cloned into every new project
pub const DEFAULT_BOILERPLATE_REPO: &str = "git@github.com:bokkagroup/catalyst-wp-boilerplate.git";

/// Child theme cloned into the WordPress content tree
pub const DEFAULT_THEME_REPO: &str = "git@github.com:bokkagroup/atom-child.git";

/// Child theme location relative to the project root
pub const DEFAULT_THEME_DIR: &str = "wp-content/themes/atom-child";

pub const DEFAULT_INSTALL_COMMAND: &str = "composer install";

/// Top-level domain appended to project names for local hosts
pub const LOCAL_TLD: &str = "test";

pub const BASE_NAMESPACE: &str = "CatalystWP";
pub const THEME_NAMESPACE: &str = "AtomChild";

/// Template file names, relative to the templates directory
pub mod templates {
    pub const WP_CONFIG: &str = "wp-config.php.j2";
    pub const NGINX_CONF: &str = "vvv-nginx.conf.j2";
    pub const INIT_SCRIPT: &str = "vvv-init.sh.j2";
    pub const MODEL: &str = "model.php.j2";
    pub const VIEW: &str = "view.php.j2";
    pub const CONTROLLER: &str = "controller.php.j2";
}
