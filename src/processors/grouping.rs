//! Grouping of derived placemarks into class and city hierarchies.
//!
//! The two groupings are parallel, not nested: every placemark is inserted
//! into exactly one class folder and exactly one city folder.

use std::collections::HashMap;

use crate::core::derive::Placemark;

/// A named folder holding placemarks in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    /// Display label ("Class B", or the bare city name).
    pub name: String,
    /// Grouping key the folder was registered under.
    pub key: String,
    pub placemarks: Vec<Placemark>,
}

impl Folder {
    fn new(name: String, key: String) -> Self {
        Self {
            name,
            key,
            placemarks: Vec::new(),
        }
    }
}

/// Two parallel groupings of the same placemark set.
#[derive(Debug, Clone)]
pub struct PlacemarkGroups {
    /// Class folders in first-occurrence order of the sorted input.
    pub class_folders: Vec<Folder>,
    /// City folders in lexicographic order of the city name.
    pub city_folders: Vec<Folder>,
    /// Placemarks whose key matched no registered folder.
    ///
    /// Defensive bucket: cannot fill when the folders were derived from the
    /// same table as the placemarks.
    pub ungrouped: Vec<Placemark>,
}

/// Partition placemarks into class folders and city folders.
///
/// Class folders are labeled `"Class <value>"` and appear in first-occurrence
/// order of the (frequency-sorted) input; city folders carry the bare city
/// name and are registered in sorted order before population.
pub fn group_placemarks(placemarks: &[Placemark]) -> PlacemarkGroups {
    let mut class_folders: Vec<Folder> = Vec::new();
    let mut class_index: HashMap<String, usize> = HashMap::new();
    for placemark in placemarks {
        if !class_index.contains_key(&placemark.class) {
            class_index.insert(placemark.class.clone(), class_folders.len());
            class_folders.push(Folder::new(
                format!("Class {}", placemark.class),
                placemark.class.clone(),
            ));
        }
    }

    let mut cities: Vec<String> = placemarks.iter().map(|p| p.city.clone()).collect();
    cities.sort();
    cities.dedup();
    let mut city_folders: Vec<Folder> = cities
        .into_iter()
        .map(|city| Folder::new(city.clone(), city))
        .collect();
    let city_index: HashMap<String, usize> = city_folders
        .iter()
        .enumerate()
        .map(|(i, folder)| (folder.key.clone(), i))
        .collect();

    let mut ungrouped = Vec::new();
    for placemark in placemarks {
        match class_index.get(&placemark.class) {
            Some(&i) => class_folders[i].placemarks.push(placemark.clone()),
            None => ungrouped.push(placemark.clone()),
        }
        match city_index.get(&placemark.city) {
            Some(&i) => city_folders[i].placemarks.push(placemark.clone()),
            None => ungrouped.push(placemark.clone()),
        }
    }

    PlacemarkGroups {
        class_folders,
        city_folders,
        ungrouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placemark(name: &str, class: &str, city: &str) -> Placemark {
        Placemark {
            name: name.to_string(),
            description: String::new(),
            longitude: -73.5,
            latitude: 45.1,
            class: class.to_string(),
            city: city.to_string(),
        }
    }

    #[test]
    fn test_class_folders_in_first_occurrence_order() {
        let placemarks = vec![
            placemark("p1", "B", "Springfield"),
            placemark("p2", "A", "Shelbyville"),
            placemark("p3", "B", "Capital City"),
            placemark("p4", "C", "Springfield"),
        ];

        let groups = group_placemarks(&placemarks);

        let labels: Vec<&str> = groups
            .class_folders
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(labels, vec!["Class B", "Class A", "Class C"]);
    }

    #[test]
    fn test_city_folders_sorted_lexicographically() {
        let placemarks = vec![
            placemark("p1", "B", "Springfield"),
            placemark("p2", "A", "Capital City"),
            placemark("p3", "B", "Shelbyville"),
        ];

        let groups = group_placemarks(&placemarks);

        let labels: Vec<&str> = groups
            .city_folders
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(labels, vec!["Capital City", "Shelbyville", "Springfield"]);
    }

    #[test]
    fn test_every_placemark_lands_in_both_hierarchies() {
        let placemarks = vec![
            placemark("p1", "B", "Springfield"),
            placemark("p2", "A", "Shelbyville"),
            placemark("p3", "B", "Springfield"),
        ];

        let groups = group_placemarks(&placemarks);

        let class_total: usize = groups
            .class_folders
            .iter()
            .map(|f| f.placemarks.len())
            .sum();
        let city_total: usize = groups
            .city_folders
            .iter()
            .map(|f| f.placemarks.len())
            .sum();

        assert_eq!(class_total, 3);
        assert_eq!(city_total, 3);
        assert!(groups.ungrouped.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved_within_folder() {
        let placemarks = vec![
            placemark("first", "B", "Springfield"),
            placemark("second", "B", "Springfield"),
        ];

        let groups = group_placemarks(&placemarks);

        let names: Vec<&str> = groups.class_folders[0]
            .placemarks
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_empty_input() {
        let groups = group_placemarks(&[]);

        assert!(groups.class_folders.is_empty());
        assert!(groups.city_folders.is_empty());
        assert!(groups.ungrouped.is_empty());
    }
}
