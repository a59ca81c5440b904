use std::borrow::Borrow;
use std::marker::PhantomData;

/// A typed index into an [`ElementStore`].
pub trait ElementId: Clone + Copy + From<usize> + Into<usize> {
}

/// Dense storage of mesh elements addressed by a typed id.
///
/// Elements are never removed, so ids stay stable for the life of the mesh.
#[derive(Clone, Debug)]
pub struct ElementStore<I: ElementId, T> {
    array: Vec<T>,
    marker: PhantomData<I>,
}

impl<I: ElementId, T> Default for ElementStore<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ElementId, T> ElementStore<I, T> {
    pub fn new() -> Self {
        Self {
            array: vec![],
            marker: PhantomData,
        }
    }

    pub fn ids(&self) -> ElementIdIter<I> {
        ElementIdIter {
            index: 0,
            count: self.array.len(),
            marker: PhantomData,
        }
    }

    pub fn contains<K: Borrow<I>>(&self, id: K) -> bool {
        self.get(id).is_some()
    }

    pub fn values(&self) -> impl Iterator<Item=&T> {
        self.array.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item=&mut T> {
        self.array.iter_mut()
    }

    /// Iterate `(id, element)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item=(I, &T)> {
        self.array.iter().enumerate().map(|(i, t)| (I::from(i), t))
    }

    pub fn push(&mut self, item: T) -> I {
        let id = I::from(self.array.len());
        self.array.push(item);
        id
    }

    pub fn get<K: Borrow<I>>(&self, id: K) -> Option<&T> {
        self.array.get((*id.borrow()).into())
    }

    pub fn get_mut<K: Borrow<I>>(&mut self, id: K) -> Option<&mut T> {
        self.array.get_mut((*id.borrow()).into())
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }
}

impl<'a, I: ElementId, T> IntoIterator for &'a ElementStore<I, T> {
    type Item = I;
    type IntoIter = ElementIdIter<I>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids()
    }
}

pub struct ElementIdIter<I: ElementId> {
    index: usize,
    count: usize,
    marker: PhantomData<I>,
}

impl<I: ElementId> Iterator for ElementIdIter<I> {
    type Item = I;

    fn next(&mut self) -> Option<I> {
        if self.index >= self.count {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(I::from(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.index;
        (left, Some(left))
    }
}

impl<I: ElementId> ExactSizeIterator for ElementIdIter<I> {}

// Indexing panics on a foreign id; ids handed out by the owning mesh are always in range.
impl<K: Borrow<I>, I: ElementId, T> std::ops::Index<K> for ElementStore<I, T> {
    type Output = T;

    fn index(&self, id: K) -> &Self::Output {
        &self.array[(*id.borrow()).into()]
    }
}

impl<K: Borrow<I>, I: ElementId, T> std::ops::IndexMut<K> for ElementStore<I, T> {
    fn index_mut(&mut self, id: K) -> &mut Self::Output {
        &mut self.array[(*id.borrow()).into()]
    }
}
