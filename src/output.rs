//! Macros for user-facing terminal output.
//!
//! Each macro takes the message plus the `silent` flag; silent mode
//! suppresses the line entirely. Log-facade output is unaffected.

/// Prints an informational detail line unless silent.
#[macro_export]
macro_rules! detail {
    ($name:expr, $silent:expr) => {
        if !$silent {
            use colored::Colorize;
            println!("{} {}", "[~]".cyan(), $name.cyan());
        }
    };
}

/// Prints a warning line unless silent.
#[macro_export]
macro_rules! warning {
    ($name:expr, $silent:expr) => {
        if !$silent {
            use colored::Colorize;
            println!("{} {}", "[!]".red(), $name.yellow());
        }
    };
}

/// Prints a success line unless silent.
#[macro_export]
macro_rules! success {
    ($name:expr, $silent:expr) => {
        if !$silent {
            use colored::Colorize;
            println!("{} {}", "[+]".green(), $name.green());
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn macros_expand_with_both_flags() {
        detail!("probing", true);
        warning!("nmap missing", true);
        success!("done", true);
        detail!(format!("{} ports", 3), true);
    }
}
