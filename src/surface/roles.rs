/// Structural roles the pipeline looks up on results and detail pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Title of a card on the results page
    CardTitle,
    /// Price row of a card on the results page
    CardPrice,
    /// Anchor pointing at a card's detail page
    CardLink,
    /// Control advancing to the next results page
    NextPage,
    /// Primary heading of a detail page
    DetailHeading,
    /// One line of the capacity summary ("4 viajeros", "2 camas", ...)
    AmenityLine,
    /// Average rating ("4,85")
    Rating,
    /// Short review count next to the rating
    ReviewCount,
    /// Longer, link-embedded review count ("123 reseñas")
    ReviewCountLink,
    /// Hero image of a detail page
    HeroImage,
}

/// How a role is found in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    /// CSS selector matched against the document
    pub css: &'static str,
    /// Keep only elements whose text contains this fragment
    pub text_contains: Option<&'static str>,
}

impl Locator {
    const fn css(css: &'static str) -> Self {
        Self {
            css,
            text_contains: None,
        }
    }

    /// Whether an element with this text passes the locator's text filter
    pub fn accepts_text(&self, text: &str) -> bool {
        self.text_contains.is_none_or(|needle| text.contains(needle))
    }
}

impl Role {
    /// The locator registered for this role.
    ///
    /// Site markup drift only requires touching this table.
    pub fn locator(self) -> Locator {
        match self {
            Role::CardTitle => Locator::css(r#"div[data-testid="listing-card-title"]"#),
            Role::CardPrice => Locator::css(r#"div[data-testid="price-availability-row"]"#),
            Role::CardLink => Locator::css("a[aria-labelledby]"),
            Role::NextPage => Locator::css(r#"a[aria-label="Siguiente"]"#),
            Role::DetailHeading => Locator::css(r#"h1[elementtiming="LCP-target"]"#),
            Role::AmenityLine => Locator::css("li.l7n4lsf"),
            Role::Rating => Locator {
                css: r#"div[aria-hidden="true"]"#,
                text_contains: Some(","),
            },
            Role::ReviewCount => Locator::css("div.r16onr0j"),
            Role::ReviewCountLink => Locator::css("a.l1ovpqvx"),
            Role::HeroImage => Locator::css(r#"img[elementtiming="LCP-target"]"#),
        }
    }
}
