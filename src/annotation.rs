//! Decoded records handed to the presentation layer.

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Reserved,
    Write,
    Read,
    DataCommand,
    DisplayCommand,
    AddressCommand,
    AutoAddressing,
    FixedAddressing,
    NormalMode,
    TestMode,
    DigitValue,
    ContrastLevel,
    DisplayOff,
    DisplayOn,
    ActiveSegment,
    DisplaySummary,
    Warning,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Row {
    Bits,
    Display,
    Warnings,
}

impl Category {
    /// Names from the longest to the shortest.
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Category::Reserved => &["Reserved", "Rsvd", "R"],
            Category::Write => &["Write", "Wrt", "W"],
            Category::Read => &["Read", "Rd", "R"],
            Category::DataCommand => &["Data command", "Data Cmd", "Data", "D"],
            Category::DisplayCommand => &["Display command", "Display Cmd", "Display", "S"],
            Category::AddressCommand => &["Address command", "Address Cmd", "Address", "Addr", "A"],
            Category::AutoAddressing => &["AutoAddr", "Auto", "A"],
            Category::FixedAddressing => &["FixedAddr", "Fix", "F"],
            Category::NormalMode => &["Normal", "Nrm", "N"],
            Category::TestMode => &["Test", "Tst", "T"],
            Category::DigitValue => &["Digit", "Dgt", "D"],
            Category::ContrastLevel => &["Contrast", "PWM", "C"],
            Category::DisplayOff => &["OFF", "L"],
            Category::DisplayOn => &["ON", "H"],
            Category::ActiveSegment => &["Segment", "Seg", "S"],
            Category::DisplaySummary => &["Tubes", "T"],
            Category::Warning => &["Warnings", "Warn", "W"],
        }
    }

    pub fn row(&self) -> Row {
        match self {
            Category::DisplaySummary => Row::Display,
            Category::Warning => Row::Warnings,
            _ => Row::Bits,
        }
    }

    /// Identifier in the `row-name` form, e.g. `bit-reserved`.
    pub fn id(&self) -> String {
        let prefix = match self.row() {
            Row::Bits => "bit",
            Row::Display | Row::Warnings => "info",
        };
        format!("{}-{}", prefix, self.names()[0].to_lowercase())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub ss: u64,
    pub es: u64,
    pub category: Category,
    pub label: String,
    /// Value embedded in the label, for contrast, digit and summary records.
    pub value: Option<String>,
}

impl Annotation {
    /// Record labelled with the category's long name.
    pub fn new(ss: u64, es: u64, category: Category) -> Annotation {
        Annotation {
            ss,
            es,
            category,
            label: category.names()[0].to_string(),
            value: None,
        }
    }

    /// Record labelled `"<name>: <value>"`.
    pub fn with_value(ss: u64, es: u64, category: Category, value: impl Into<String>) -> Annotation {
        let value = value.into();
        Annotation {
            ss,
            es,
            category,
            label: format!("{}: {}", category.names()[0], value),
            value: Some(value),
        }
    }

    /// Record with a free-form label.
    pub fn labelled(ss: u64, es: u64, category: Category, label: impl Into<String>) -> Annotation {
        Annotation {
            ss,
            es,
            category,
            label: label.into(),
            value: None,
        }
    }

    /// Label variants from the longest to the shortest, for renderers
    /// short on space.
    ///
    /// With a value every name is combined with it and the two shortest
    /// bare names are added at the end.
    pub fn labels(&self) -> Vec<String> {
        let names = self.category.names();
        let mut labels: Vec<String> = match &self.value {
            Some(value) => names
                .iter()
                .map(|name| format!("{}: {}", name, value))
                .chain(names[names.len().saturating_sub(2)..].iter().map(|n| n.to_string()))
                .collect(),
            None if self.label != names[0] => vec![self.label.clone()],
            None => names.iter().map(|n| n.to_string()).collect(),
        };
        labels.sort_by(|a, b| b.len().cmp(&a.len()));
        labels
    }
}

/// Receiver of decoded records.
pub trait AnnotationSink {
    fn put(&mut self, annotation: Annotation);
}

impl AnnotationSink for Vec<Annotation> {
    fn put(&mut self, annotation: Annotation) {
        self.push(annotation);
    }
}
