use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy)]
pub enum Status {
    Running,
    Failed,
    Success,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Running => write!(f, "{}", "Running:".bright_blue()),
            Status::Failed => write!(f, "{}", "Failed:".red()),
            Status::Success => write!(f, "{}", "Success:".green()),
        }
    }
}

/// Terminal output. Status lines go to stderr, command results to stdout.
#[derive(Debug, Default)]
pub struct Ui {
    quiet: bool,
}

impl Ui {
    pub fn new() -> Self {
        Self::default()
    }

    /// No status lines, results only
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    fn status(&self, status: Status, message: impl AsRef<str>) {
        if !self.quiet {
            eprintln!("{} {}", status, message.as_ref());
        }
    }

    pub fn new_status_line(&self, message: impl AsRef<str>) {
        self.status(Status::Running, message)
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.status(Status::Success, message)
    }

    pub fn failed(&self, message: impl AsRef<str>) {
        self.status(Status::Failed, message)
    }

    pub fn println(&self, message: impl AsRef<str>) {
        if !message.as_ref().is_empty() {
            println!("{}", message.as_ref());
        }
    }
}
