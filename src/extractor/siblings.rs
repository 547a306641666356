use super::predicates::is_section_break;
use scraper::ElementRef;

/// Element siblings following a heading, up to (not including) the next h1/h2.
///
/// Text and comment nodes are skipped. The iterator is `Copy`, so a saved
/// value can be iterated again from the same starting point.
#[derive(Debug, Clone, Copy)]
pub struct FollowingSiblings<'a> {
    next: Option<ElementRef<'a>>,
}

impl<'a> FollowingSiblings<'a> {
    pub fn after(heading: ElementRef<'a>) -> Self {
        Self {
            next: next_element_sibling(heading),
        }
    }
}

impl<'a> Iterator for FollowingSiblings<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if is_section_break(current.value().name()) {
            self.next = None;
            return None;
        }
        self.next = next_element_sibling(current);
        Some(current)
    }
}

impl std::iter::FusedIterator for FollowingSiblings<'_> {}

fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}
