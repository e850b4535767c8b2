//! Publish the public directory to a git remote

use anyhow::Result;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use crate::error::SiteError;
use crate::Course;

/// One external command of a deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployStep {
    pub program: String,
    pub args: Vec<String>,
}

impl DeployStep {
    fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: "git".to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// The commands a deploy runs, in order, inside `dir`
#[derive(Debug, Clone)]
pub struct DeployPlan {
    pub dir: PathBuf,
    pub steps: Vec<DeployStep>,
}

/// Plan a force-push of the public directory to `deploy.repo` / `deploy.branch`
pub fn plan(course: &Course) -> Result<DeployPlan, SiteError> {
    let deploy = &course.config.deploy;
    if deploy.repo.trim().is_empty() {
        return Err(SiteError::DeployNotConfigured);
    }
    if !course.public_dir.is_dir() {
        return Err(SiteError::NothingToDeploy(course.public_dir.clone()));
    }

    let message = if deploy.message.trim().is_empty() {
        "Site updated".to_string()
    } else {
        deploy.message.clone()
    };

    Ok(DeployPlan {
        dir: course.public_dir.clone(),
        steps: vec![
            DeployStep::git(["init"]),
            DeployStep::git(["add", "-A"]),
            // An unchanged site still gets a commit, so a redeploy pushes
            DeployStep::git([
                "commit".to_string(),
                "--allow-empty".to_string(),
                "-m".to_string(),
                message,
            ]),
            DeployStep::git([
                "push".to_string(),
                "--force".to_string(),
                deploy.repo.clone(),
                format!("HEAD:{}", deploy.branch),
            ]),
        ],
    })
}

/// Run each step, stopping at the first one that fails
pub fn execute(plan: &DeployPlan) -> Result<(), SiteError> {
    for step in &plan.steps {
        tracing::info!("Running: {}", step);
        let status = Command::new(&step.program)
            .args(&step.args)
            .current_dir(&plan.dir)
            .status()?;
        if !status.success() {
            return Err(SiteError::Deploy {
                command: step.to_string(),
                status: status.to_string(),
            });
        }
    }
    Ok(())
}

/// Run the deploy command
pub fn run(course: &Course, dry_run: bool) -> Result<()> {
    let plan = plan(course)?;

    if dry_run {
        println!("Deploy plan (in {:?}):", plan.dir);
        for step in &plan.steps {
            println!("  {}", step);
        }
        return Ok(());
    }

    execute(&plan)?;
    println!("Deploy complete!");
    Ok(())
}
