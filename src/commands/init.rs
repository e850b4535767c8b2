//! Initialize a new course site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Course site configuration

# Site
title: 'CIS 192: Python Programming'
subtitle: Spring 2020
description: ''
author: Arun Kirubarajan
language: en
timezone: America/New_York

# URL
url: https://cis192.github.io
root: /

# Directory
source_dir: source
public_dir: public
notes_dir: _notes
data_dir: _data

# Lecture notes
notes_credit: These notes were written by Arun Kirubarajan.
highlight:
  theme: InspiredGitHub
  line_number: false

# Deployment
deploy:
  repo: https://github.com/cis192/cis192.github.io.git
  branch: master
  message: Site updated
"#;

const SYLLABUS: &str = r#"facts:
  - { label: Instructor, value: Arun Kirubarajan (Section 201) }
  - { label: Location, value: Thursdays at 12:00 PM in Towne 303 }
body: |
  Welcome! Python is a powerful interpreted language with both imperative and
  functional paradigms. This class teaches the skills necessary to excel in
  Python programming, along with the ecosystem that makes Python so powerful.

  **Syllabus**

  After the Python fundamentals, the course is split into three modules:
  classical algorithms, web development and machine learning.

  **Grading**

  Six programming assignments count for 60% of the final grade. The final
  project counts for 30% and participation makes up the remaining 10%.
"#;

const SCHEDULE: &str = r#"heading: Lectures
intro: |
  Each lecture has its associated readings listed under the link to the
  lecture material. Assignments and their scheduling are subject to change.
sections:
  - columns:
      - { label: Week, field: week }
      - { label: Date, field: date }
      - { label: Topics, field: topics, link: notes }
      - { label: Homework, field: hw, link: hw_link }
    records:
      - { week: 0, date: '08/31', topics: Python Basics, notes: /basics, hw: HW0, hw_link: 'https://raw.githubusercontent.com/CIS192/homework/master/assignment0.py' }
      - { week: 1, date: '9/7', topics: Data Structures and Algorithms, notes: /data_structures }
  - heading: Guides
    intro: 'A variety of handy guides to quickly get yourself up and running:'
    columns:
      - { label: Topics, field: topics }
      - { label: Resources, text: Guide, link: notes }
    records:
      - { topics: Installing Python, notes: /install }
"#;

const LECTURES: &str = r#"heading: Lectures
sections:
  - columns:
      - { label: Lecture, field: topics, link: notes }
    records:
      - { topics: Python Basics, notes: /basics }
"#;

const ASSIGNMENTS: &str = r#"heading: Assignments
intro: |
  Each assignment is designed to take roughly 4 to 5 hours to complete. Start
  early and come to office hours!
groups:
  - heading: Pythonic Foundations
    items:
      - { title: 'Assignment 1: Finger Workouts', link: 'https://github.com/CIS192/homework/blob/master/assignment1.py', download: true }
      - { title: 'Assignment 2: Data Structures and Algorithms' }
  - heading: Final Project
    items:
      - { title: 'Milestone 1: Project Proposal' }
"#;

const STAFF: &str = r#"heading: Staff
members:
  - name: Arun Kirubarajan
    role: Instructor
    email: kirubara@seas.upenn.edu
    bio: Arun teaches CIS 192.
"#;

const SAMPLE_NOTE: &str = r#"---
title: Python Basics
path: /basics
date: {date}
---

# Python Basics

Everything in Python is an object.

```python
print("Hello, world!")
```
"#;

/// Initialize a new course site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("A site already exists in {:?}", target_dir);
    }

    // Create directory structure
    fs::create_dir_all(target_dir.join("source/_notes"))?;
    fs::create_dir_all(target_dir.join("source/_data"))?;

    fs::write(&config_path, CONFIG)?;

    let data = target_dir.join("source/_data");
    fs::write(data.join("syllabus.yml"), SYLLABUS)?;
    fs::write(data.join("schedule.yml"), SCHEDULE)?;
    fs::write(data.join("lectures.yml"), LECTURES)?;
    fs::write(data.join("assignments.yml"), ASSIGNMENTS)?;
    fs::write(data.join("staff.yml"), STAFF)?;

    // Create a sample note
    let now = chrono::Local::now();
    let sample_note = SAMPLE_NOTE.replace("{date}", &now.format("%Y-%m-%d %H:%M:%S").to_string());
    fs::write(target_dir.join("source/_notes/basics.md"), sample_note)?;

    tracing::debug!("Scaffolded course site in {:?}", target_dir);

    Ok(())
}
