//! In-memory metric families handed to the exposition layer.

/// A labeled value inside a [`MetricFamily`]
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub label_values: Vec<String>,
    pub value: f64,
}

/// Named group of samples sharing one label schema
///
/// Every family is exposed as a gauge, including the `_bucket` families, whose
/// samples hold per-bucket counts rather than cumulative ones.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    pub name: String,
    pub help: String,
    pub label_names: Vec<String>,
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    pub fn new(name: String, help: String, label_names: Vec<String>) -> Self {
        Self {
            name,
            help,
            label_names,
            samples: Vec::new(),
        }
    }

    /// Append a sample; `label_values` must line up with `label_names`
    pub fn add_sample(&mut self, label_values: Vec<String>, value: f64) {
        debug_assert_eq!(
            label_values.len(),
            self.label_names.len(),
            "label values do not match schema of {}",
            self.name
        );
        self.samples.push(Sample {
            label_values,
            value,
        });
    }

    /// Label name/value pairs of one sample, in schema order
    pub fn labels<'a>(&'a self, sample: &'a Sample) -> Vec<(&'a str, &'a str)> {
        self.label_names
            .iter()
            .map(String::as_str)
            .zip(sample.label_values.iter().map(String::as_str))
            .collect()
    }

    /// First sample whose label values equal `values`
    pub fn find_sample(&self, values: &[&str]) -> Option<&Sample> {
        self.samples
            .iter()
            .find(|s| s.label_values.iter().map(String::as_str).eq(values.iter().copied()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_pair_names_with_values() {
        let mut family = MetricFamily::new(
            "druid_active_count".to_string(),
            "Druid ActiveCount".to_string(),
            vec!["env".to_string(), "pool".to_string()],
        );
        family.add_sample(vec!["prod".to_string(), "p1".to_string()], 5.0);

        let sample = &family.samples[0];
        assert_eq!(family.labels(sample), vec![("env", "prod"), ("pool", "p1")]);
        assert_eq!(family.find_sample(&["prod", "p1"]).map(|s| s.value), Some(5.0));
        assert!(family.find_sample(&["prod", "p2"]).is_none());
    }
}
