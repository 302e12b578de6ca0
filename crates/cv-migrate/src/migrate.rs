//! Raw JSON → [`CvDocument`].

use cv_core::{
  document::{
    Award, Certification, ContactKind, Course, CvDocument, Education,
    Experience, PersonalInfo, SkillCategory, Visibility,
  },
  sidebar::SidebarSection,
};
use cv_markup::{migrate_bullets_value, migrate_markdown_bold};
use serde_json::Value;
use strum::IntoEnumIterator;
use tracing::debug;
use uuid::Uuid;

use crate::decode::{
  LegacyContact, Loose, RawDocument, RawPersonalInfo, RawVisibility, Records,
  RichText,
};

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Migrate any JSON value into a fully-populated canonical document.
///
/// Total: wrong types, missing fields and non-object input all yield safe
/// defaults field by field. Migrating an already-canonical document is a
/// structural no-op.
pub fn migrate(raw: &Value) -> CvDocument {
  let raw = RawDocument::decode(raw);

  let personal_info = match raw.personal_info {
    Loose::Valid(info) => migrate_personal_info(info, &raw.contacts),
    Loose::Invalid => {
      let mut info = PersonalInfo::default();
      migrate_contacts(&mut info, &raw.contacts);
      info
    }
  };

  CvDocument {
    personal_info,
    summary: rich_text(raw.summary),
    experiences: entries("experiences", raw.experiences, |i, id, e| Experience {
      id,
      company:     e.company.0,
      position:    e.position.0,
      location:    e.location.0,
      start_date:  e.start_date.0,
      end_date:    e.end_date.0,
      current:     e.current.valid().unwrap_or(false),
      description: rich_text(e.description),
      sort_order:  i,
    }),
    education: entries("education", raw.education, |i, id, e| Education {
      id,
      institution: e.institution.0,
      degree:      e.degree.0,
      field:       e.field.0,
      location:    e.location.0,
      start_date:  e.start_date.0,
      end_date:    e.end_date.0,
      description: rich_text(e.description),
      sort_order:  i,
    }),
    skills: entries("skills", raw.skills, |i, id, e| SkillCategory {
      id,
      name:       e.name.0,
      skills:     rich_text(e.skills),
      sort_order: i,
    }),
    courses: entries("courses", raw.courses, |i, id, e| Course {
      id,
      name:        e.name.0,
      institution: e.institution.0,
      date:        e.date.0,
      description: rich_text(e.description),
      sort_order:  i,
    }),
    certifications: entries(
      "certifications",
      raw.certifications,
      |i, id, e| Certification {
        id,
        name:       e.name.0,
        issuer:     e.issuer.0,
        date:       e.date.0,
        url:        e.url.0,
        sort_order: i,
      },
    ),
    awards: entries("awards", raw.awards, |i, id, e| Award {
      id,
      title:       e.title.0,
      issuer:      e.issuer.0,
      date:        e.date.0,
      description: rich_text(e.description),
      sort_order:  i,
    }),
    visibility: raw
      .visibility
      .valid()
      .map(migrate_visibility)
      .unwrap_or_default(),
    sidebar_order: migrate_sidebar_order(&raw.sidebar_order),
  }
}

// ─── Sidebar order ───────────────────────────────────────────────────────────

/// Normalise a stored sidebar order into a permutation of the three
/// sections.
///
/// Non-arrays yield the default order. Otherwise unknown and duplicate ids
/// are dropped (keeping the relative order of the rest) and any missing
/// section is appended in default order.
pub fn migrate_sidebar_order(value: &Value) -> Vec<SidebarSection> {
  let Value::Array(ids) = value else {
    return SidebarSection::default_order().to_vec();
  };

  let mut order: Vec<SidebarSection> = Vec::with_capacity(3);
  for section in ids
    .iter()
    .filter_map(Value::as_str)
    .filter_map(|id| SidebarSection::parse(id).ok())
  {
    if !order.contains(&section) {
      order.push(section);
    }
  }
  for section in SidebarSection::default_order() {
    if !order.contains(section) {
      order.push(*section);
    }
  }
  order
}

// ─── Contacts ────────────────────────────────────────────────────────────────

/// Fill empty flat contact fields from a legacy `contacts` list.
///
/// Non-blank flat fields are authoritative. When the list holds several
/// entries of one kind, the first non-blank one wins.
pub fn migrate_contacts(info: &mut PersonalInfo, legacy: &Value) {
  let contacts = LegacyContact::decode_list(legacy);
  if contacts.is_empty() {
    return;
  }
  for kind in ContactKind::iter() {
    if !info.contact(kind).trim().is_empty() {
      continue;
    }
    if let Some(found) = contacts
      .iter()
      .find(|c| c.kind == kind && !c.value.trim().is_empty())
    {
      *info.contact_mut(kind) = found.value.clone();
    }
  }
}

fn migrate_personal_info(
  raw: RawPersonalInfo,
  top_level_contacts: &Value,
) -> PersonalInfo {
  let photo = Some(raw.photo.0).filter(|p| !p.is_empty());
  let mut info = PersonalInfo {
    full_name: raw.full_name.0,
    title:     raw.title.0,
    email:     raw.email.0,
    phone:     raw.phone.0,
    location:  raw.location.0,
    linkedin:  raw.linkedin.0,
    website:   raw.website.0,
    photo,
  };
  migrate_contacts(&mut info, &raw.contacts);
  migrate_contacts(&mut info, top_level_contacts);
  info
}

// ─── Rich text ───────────────────────────────────────────────────────────────

/// Route a description-like field to the right legacy conversion by its
/// runtime shape: arrays are bullet lists, strings with whitelisted tags are
/// kept, other strings go through markdown-bold conversion.
pub fn migrate_rich_text(value: &Value) -> String {
  rich_text(RichText::from_value(value))
}

fn rich_text(field: RichText) -> String {
  match field {
    RichText::Markup(markup) => markup,
    RichText::Legacy(text) => migrate_markdown_bold(&text),
    RichText::Bullets(items) => migrate_bullets_value(&items),
    RichText::Missing => String::new(),
  }
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// Entries carry an `id` that is kept when non-empty.
trait HasId {
  fn take_id(&mut self) -> String;
}

macro_rules! has_id {
  ($($ty:ty),* $(,)?) => {
    $(impl HasId for $ty {
      fn take_id(&mut self) -> String { std::mem::take(&mut self.id.0) }
    })*
  };
}

has_id!(
  crate::decode::RawExperience,
  crate::decode::RawEducation,
  crate::decode::RawSkillCategory,
  crate::decode::RawCourse,
  crate::decode::RawCertification,
  crate::decode::RawAward,
);

/// Deterministic id for an entry stored without one.
pub(crate) fn derived_id(section: &str, index: usize) -> String {
  Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("cv:{section}:{index}").as_bytes())
    .to_string()
}

fn entries<R: HasId, T>(
  section: &str,
  records: Records<R>,
  build: impl Fn(u32, String, R) -> T,
) -> Vec<T> {
  if records.dropped > 0 {
    debug!(section, dropped = records.dropped, "dropped non-object entries");
  }
  records
    .items
    .into_iter()
    .enumerate()
    .map(|(index, mut record)| {
      let id = match record.take_id() {
        id if id.trim().is_empty() => derived_id(section, index),
        id => id,
      };
      build(index as u32, id, record)
    })
    .collect()
}

fn migrate_visibility(raw: RawVisibility) -> Visibility {
  let on = |flag: Loose<bool>| flag.valid().unwrap_or(true);
  Visibility {
    photo:          on(raw.photo),
    summary:        on(raw.summary),
    experiences:    on(raw.experiences),
    education:      on(raw.education),
    skills:         on(raw.skills),
    courses:        on(raw.courses),
    certifications: on(raw.certifications),
    awards:         on(raw.awards),
  }
}
