//! Backend content sections and their endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HprError;

/// How a section is exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    /// A list of items with create/update/delete by id.
    Editable,
    /// A list of items the site only reads.
    ReadOnly,
    /// A single document replaced as a whole with `PUT`.
    EditableDocument,
    /// A single document the site only reads.
    ReadOnlyDocument,
}

/// Required inputs of an admin form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSchema {
    /// Text fields that must be non-blank.
    pub required_fields: &'static [&'static str],
    /// Whether an image must be attached when creating (never when updating).
    pub image_required_on_create: bool,
}

impl FormSchema {
    const NONE: FormSchema = FormSchema {
        required_fields: &[],
        image_required_on_create: false,
    };
}

/// A content section of the site.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    HeroCarousel,
    Projects,
    Testimonials,
    Gallery,
    CompanyValues,
    News,
    AboutSections,
    Partners,
    MissionStatement,
    Footer,
    AboutUs,
}

impl Collection {
    pub const ALL: [Collection; 11] = [
        Self::HeroCarousel,
        Self::Projects,
        Self::Testimonials,
        Self::Gallery,
        Self::CompanyValues,
        Self::News,
        Self::AboutSections,
        Self::Partners,
        Self::MissionStatement,
        Self::Footer,
        Self::AboutUs,
    ];

    /// Endpoint path relative to the API base URL.
    pub const fn path(self) -> &'static str {
        match self {
            Self::HeroCarousel => "/hero-carousel",
            Self::Projects => "/home/projects",
            Self::Testimonials => "/home/testimonials",
            Self::Gallery => "/gallery",
            Self::CompanyValues => "/home/company-values",
            Self::News => "/news",
            Self::AboutSections => "/about-us/sections",
            Self::Partners => "/partners",
            Self::MissionStatement => "/mission",
            Self::Footer => "/home/footer",
            Self::AboutUs => "/about-us",
        }
    }

    /// Name used on the command line and in logs.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::HeroCarousel => "hero-carousel",
            Self::Projects => "projects",
            Self::Testimonials => "testimonials",
            Self::Gallery => "gallery",
            Self::CompanyValues => "company-values",
            Self::News => "news",
            Self::AboutSections => "about-sections",
            Self::Partners => "partners",
            Self::MissionStatement => "mission-statement",
            Self::Footer => "footer",
            Self::AboutUs => "about-us",
        }
    }

    pub const fn kind(self) -> CollectionKind {
        match self {
            Self::HeroCarousel | Self::Projects | Self::Testimonials | Self::Gallery => {
                CollectionKind::Editable
            }
            Self::CompanyValues | Self::News | Self::AboutSections | Self::Partners => {
                CollectionKind::ReadOnly
            }
            Self::MissionStatement => CollectionKind::EditableDocument,
            Self::Footer | Self::AboutUs => CollectionKind::ReadOnlyDocument,
        }
    }

    pub const fn is_document(self) -> bool {
        matches!(
            self.kind(),
            CollectionKind::EditableDocument | CollectionKind::ReadOnlyDocument
        )
    }

    /// Whether the section is partitioned by `category`.
    pub const fn is_categorized(self) -> bool {
        matches!(self, Self::Gallery)
    }

    pub const fn form_schema(self) -> FormSchema {
        match self {
            Self::HeroCarousel => FormSchema {
                required_fields: &["heading", "subheading"],
                image_required_on_create: true,
            },
            Self::Projects => FormSchema {
                required_fields: &["title", "description"],
                image_required_on_create: true,
            },
            Self::Testimonials => FormSchema {
                required_fields: &["name", "message"],
                image_required_on_create: true,
            },
            Self::Gallery => FormSchema {
                required_fields: &["category", "description", "work_date"],
                image_required_on_create: true,
            },
            Self::MissionStatement => FormSchema {
                required_fields: &["heading", "description"],
                image_required_on_create: false,
            },
            _ => FormSchema::NONE,
        }
    }

    /// Endpoint path of a single item.
    pub fn item_path(self, id: &str) -> String {
        format!("{}/{}", self.path(), id)
    }

    /// Fails unless the section accepts item create/update/delete.
    pub fn ensure_editable(self) -> Result<(), HprError> {
        match self.kind() {
            CollectionKind::Editable => Ok(()),
            _ => Err(HprError::unsupported(format!(
                "{} does not accept item changes",
                self.slug()
            ))),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Collection {
    type Err = HprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| HprError::not_found("collection", wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugs_round_trip_through_from_str() {
        for collection in Collection::ALL {
            assert_eq!(collection.slug().parse::<Collection>().unwrap(), collection);
        }
    }

    #[test]
    fn test_item_path() {
        assert_eq!(Collection::Projects.item_path("12"), "/home/projects/12");
        assert_eq!(Collection::News.item_path("4"), "/news/4");
    }

    #[test]
    fn test_only_lists_with_crud_are_editable() {
        assert!(Collection::Testimonials.ensure_editable().is_ok());
        assert!(Collection::News.ensure_editable().is_err());
        assert!(Collection::MissionStatement.ensure_editable().is_err());
        assert!(Collection::MissionStatement.is_document());
    }

    #[test]
    fn test_gallery_is_the_only_categorized_section() {
        let categorized: Vec<_> = Collection::ALL
            .into_iter()
            .filter(|c| c.is_categorized())
            .collect();
        assert_eq!(categorized, vec![Collection::Gallery]);
    }
}
